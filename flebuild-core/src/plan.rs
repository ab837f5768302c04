// ============================================================================
// flebuild-core/src/plan.rs
// ============================================================================
//
// BUILD PLANNING: Source/Target Pairing and Staleness
//
// Pairs every discovered source with its target and classifies the target:
// - Missing: no target file yet
// - Stale: target modified before its source
// - UpToDate: target at least as new as its source (equal mtimes count)
//
// Planning never touches the output directory, so it is also what the
// `status` command and dry runs use.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::BuildConfig;
use crate::discovery::{find_source_files, target_path_for};
use crate::error::CoreResult;

/// Freshness of a target relative to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Missing,
    Stale,
    UpToDate,
}

impl Freshness {
    pub fn as_str(self) -> &'static str {
        match self {
            Freshness::Missing => "missing",
            Freshness::Stale => "stale",
            Freshness::UpToDate => "up-to-date",
        }
    }

    pub fn needs_conversion(self) -> bool {
        !matches!(self, Freshness::UpToDate)
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source file and the target it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub target: PathBuf,
    pub freshness: Freshness,
}

impl ConversionJob {
    /// File name of the source, for messages.
    pub fn source_name(&self) -> String {
        display_name(&self.source)
    }
}

/// The jobs for one invocation, ordered by source path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    pub jobs: Vec<ConversionJob>,
    forced: bool,
}

impl BuildPlan {
    /// Jobs that will run. A forced plan runs every job.
    pub fn pending(&self) -> Vec<&ConversionJob> {
        self.jobs
            .iter()
            .filter(|job| self.forced || job.freshness.needs_conversion())
            .collect()
    }

    /// Jobs that will be skipped.
    pub fn up_to_date(&self) -> Vec<&ConversionJob> {
        self.jobs
            .iter()
            .filter(|job| !self.forced && !job.freshness.needs_conversion())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }
}

/// Discovers sources and classifies their targets.
pub fn plan(config: &BuildConfig) -> CoreResult<BuildPlan> {
    let sources = find_source_files(&config.source_dir)?;
    let mut jobs = Vec::with_capacity(sources.len());

    for source in sources {
        let target = target_path_for(&source, &config.output_dir)?;
        let freshness = freshness(&source, &target)?;
        log::debug!(
            "{} -> {} ({})",
            source.display(),
            target.display(),
            freshness
        );
        jobs.push(ConversionJob {
            source,
            target,
            freshness,
        });
    }

    Ok(BuildPlan {
        jobs,
        forced: config.force,
    })
}

/// Compares modification times of a source and its target.
pub fn freshness(source: &Path, target: &Path) -> CoreResult<Freshness> {
    let target_modified = match modified(target) {
        Ok(time) => time,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Freshness::Missing),
        Err(e) => return Err(e.into()),
    };
    let source_modified = modified(source)?;

    if target_modified < source_modified {
        Ok(Freshness::Stale)
    } else {
        Ok(Freshness::UpToDate)
    }
}

fn modified(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
