// ============================================================================
// flebuild-core/src/processing/driver.rs
// ============================================================================
//
// CONVERSION DRIVER: Build, Convert and Clean
//
// WORKFLOW (build_all):
// 1. Plan: discover sources and classify each target (missing/stale/up to date)
// 2. Return early when nothing is pending; the converter is not consulted
// 3. Check the converter is available (fatal when missing)
// 4. Create the output directory (fatal when it cannot be created)
// 5. Convert pending files on a bounded worker pool; failures are collected
//    per file and never abort unrelated conversions unless fail-fast is set
//
// A conversion that does not succeed has its target removed so the next run
// converts it again instead of trusting a fresh but incomplete file.

use crate::cancel::CancellationToken;
use crate::config::BuildConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::Converter;
use crate::plan::{ConversionJob, plan};
use crate::reporting::{
    BatchStartInfo, BuildSummary, ConversionFailure, ConversionOutcome, OutcomeStatus, Reporter,
};

use log::{debug, info, warn};
use rayon::prelude::*;

use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// What `clean` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    Removed,
    AlreadyClean,
}

/// Converts every source whose target is missing or stale.
///
/// Returns `Err` only for fatal conditions (invalid config, unreadable source
/// directory, missing converter, output directory failure). Per-file
/// failures are collected in the returned `BuildSummary`.
///
/// # Examples
///
/// ```rust,no_run
/// use flebuild_core::{BuildConfig, CancellationToken, ProcessConverter, build_all};
/// use flebuild_core::reporting::NullReporter;
///
/// let config = BuildConfig::default();
/// let converter = ProcessConverter::new(config.converter.clone());
/// let summary = build_all(&config, &converter, &NullReporter, &CancellationToken::new()).unwrap();
/// println!("{} converted", summary.converted);
/// ```
pub fn build_all<C, R>(
    config: &BuildConfig,
    converter: &C,
    reporter: &R,
    cancel: &CancellationToken,
) -> CoreResult<BuildSummary>
where
    C: Converter + ?Sized,
    R: Reporter + ?Sized,
{
    config.validate()?;
    let start = Instant::now();

    let build_plan = plan(config)?;
    if build_plan.is_empty() {
        info!("No .fle sources found in {}", config.source_dir.display());
        return Ok(BuildSummary::default());
    }

    let pending = build_plan.pending();
    let up_to_date = build_plan.up_to_date();

    if !pending.is_empty() {
        converter.ensure_available()?;
        ensure_output_dir(&config.output_dir)?;
    }

    let workers = config.jobs.min(pending.len()).max(1);
    reporter.batch_started(&BatchStartInfo {
        total_sources: build_plan.jobs.len(),
        pending: pending.len(),
        up_to_date: up_to_date.len(),
        output_dir: config.output_dir.display().to_string(),
        jobs: workers,
        forced: build_plan.is_forced(),
    });

    for job in &up_to_date {
        debug!("{} is up to date", job.target.display());
        reporter.conversion_skipped(job);
    }

    let outcomes = if pending.is_empty() {
        Vec::new()
    } else {
        info!(
            "Converting {} file(s) with {} using {} worker(s)",
            pending.len(),
            converter.name(),
            workers
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("flebuild-worker-{i}"))
            .build()
            .map_err(|e| {
                CoreError::OperationFailed(format!("Failed to start worker pool: {e}"))
            })?;

        let stop = AtomicBool::new(false);
        pool.install(|| {
            pending
                .par_iter()
                .map(|job| run_job(config, converter, reporter, cancel, &stop, job))
                .collect::<Vec<_>>()
        })
    };

    let mut summary = BuildSummary {
        total_sources: build_plan.jobs.len(),
        skipped: up_to_date.len(),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome.status {
            OutcomeStatus::Converted => summary.converted += 1,
            OutcomeStatus::Failed(failure) => summary.failures.push(failure),
            OutcomeStatus::NotRun => summary.not_run += 1,
        }
    }
    summary.duration = start.elapsed();

    if cancel.is_cancelled() && summary.not_run > 0 {
        reporter.warning(&format!(
            "Interrupted, {} file(s) not converted",
            summary.not_run
        ));
    }

    if summary.failures.is_empty() {
        info!(
            "{} converted, {} up to date",
            summary.converted, summary.skipped
        );
    } else {
        warn!(
            "{} conversion(s) failed: {}",
            summary.failures.len(),
            summary.failed_names().join(", ")
        );
    }
    reporter.batch_complete(&summary);
    Ok(summary)
}

fn run_job<C, R>(
    config: &BuildConfig,
    converter: &C,
    reporter: &R,
    cancel: &CancellationToken,
    stop: &AtomicBool,
    job: &ConversionJob,
) -> ConversionOutcome
where
    C: Converter + ?Sized,
    R: Reporter + ?Sized,
{
    let start = Instant::now();

    let status = if cancel.is_cancelled() || stop.load(Ordering::SeqCst) {
        debug!("Not starting {}", job.source.display());
        OutcomeStatus::NotRun
    } else {
        reporter.conversion_started(job);
        match convert_one(converter, &job.source, &job.target, cancel) {
            Ok(()) => OutcomeStatus::Converted,
            Err(CoreError::Cancelled(_)) => OutcomeStatus::NotRun,
            Err(e) => {
                if config.fail_fast {
                    stop.store(true, Ordering::SeqCst);
                }
                OutcomeStatus::Failed(failure_from(&job.source, e))
            }
        }
    };

    let outcome = ConversionOutcome {
        source: job.source.clone(),
        target: job.target.clone(),
        status,
        duration: start.elapsed(),
    };
    reporter.conversion_finished(&outcome);
    outcome
}

fn failure_from(source: &Path, err: CoreError) -> ConversionFailure {
    let message = err.to_string();
    match err {
        CoreError::ConversionFailed { status, stderr, .. } => ConversionFailure {
            source: source.to_path_buf(),
            message,
            status,
            output: stderr,
        },
        _ => ConversionFailure {
            source: source.to_path_buf(),
            message,
            status: None,
            output: String::new(),
        },
    }
}

/// Converts one source into one target.
///
/// Ensures the target's directory exists, runs the converter, and removes
/// the target again if the conversion does not succeed. The converter's
/// error is returned unchanged.
pub fn convert_one<C>(
    converter: &C,
    source: &Path,
    target: &Path,
    cancel: &CancellationToken,
) -> CoreResult<()>
where
    C: Converter + ?Sized,
{
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_output_dir(parent)?;
    }

    debug!("Converting {} -> {}", source.display(), target.display());
    match converter.convert(source, target, cancel) {
        Ok(()) => Ok(()),
        Err(e) => {
            remove_incomplete_target(target);
            Err(e)
        }
    }
}

/// Creates the output directory if absent. Concurrent callers are safe.
pub fn ensure_output_dir(path: &Path) -> CoreResult<()> {
    fs::create_dir_all(path).map_err(|e| CoreError::OutputDir {
        path: path.to_path_buf(),
        source: e,
    })
}

fn remove_incomplete_target(target: &Path) {
    match fs::remove_file(target) {
        Ok(()) => warn!("Removed incomplete output {}", target.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Could not remove incomplete output {}: {}",
            target.display(),
            e
        ),
    }
}

/// Removes the output directory and everything beneath it.
///
/// A missing directory counts as success. The config is validated first so
/// a layout where the output directory holds the sources is refused.
pub fn clean(config: &BuildConfig) -> CoreResult<CleanOutcome> {
    config.validate()?;
    let output_dir = &config.output_dir;
    match fs::remove_dir_all(output_dir) {
        Ok(()) => {
            info!("Removed {}", output_dir.display());
            Ok(CleanOutcome::Removed)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist, nothing to clean", output_dir.display());
            Ok(CleanOutcome::AlreadyClean)
        }
        Err(e) => Err(CoreError::Clean {
            path: output_dir.clone(),
            source: e,
        }),
    }
}
