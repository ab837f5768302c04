//! Progress and result reporting for builds and cleans.
//!
//! The driver emits events through the `Reporter` trait; the CLI picks the
//! human-readable `TerminalReporter` or the line-delimited `JsonReporter`.

mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::plan::ConversionJob;

use std::path::PathBuf;
use std::time::Duration;

/// Batch start metadata.
#[derive(Clone, Debug)]
pub struct BatchStartInfo {
    pub total_sources: usize,
    pub pending: usize,
    pub up_to_date: usize,
    pub output_dir: String,
    pub jobs: usize,
    /// Every source is converted regardless of freshness
    pub forced: bool,
}

/// How a single conversion ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutcomeStatus {
    Converted,
    Failed(ConversionFailure),
    /// Interrupted while running, or never started because the batch stopped.
    NotRun,
}

/// Result of one attempted conversion.
#[derive(Clone, Debug)]
pub struct ConversionOutcome {
    pub source: PathBuf,
    pub target: PathBuf,
    pub status: OutcomeStatus,
    pub duration: Duration,
}

impl ConversionOutcome {
    pub fn source_name(&self) -> String {
        crate::plan::display_name(&self.source)
    }
}

/// Details of a failed conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionFailure {
    pub source: PathBuf,
    /// Human-readable cause, e.g. "Conversion of 'b.fle' failed (exit status 3)"
    pub message: String,
    /// Converter exit status, when it exited normally
    pub status: Option<i32>,
    /// The converter's own diagnostics, unmodified
    pub output: String,
}

/// Build completion summary.
#[derive(Clone, Debug, Default)]
pub struct BuildSummary {
    pub total_sources: usize,
    pub converted: usize,
    pub skipped: usize,
    pub not_run: usize,
    pub failures: Vec<ConversionFailure>,
    pub duration: Duration,
}

impl BuildSummary {
    /// True when every pending conversion ran and succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.not_run == 0
    }

    /// File names of failed sources, in source order.
    pub fn failed_names(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| crate::plan::display_name(&f.source))
            .collect()
    }
}

/// High-level warning/error message.
#[derive(Clone, Debug)]
pub struct ReporterError {
    pub title: String,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Reporter interface implemented by both human-readable and JSON reporters.
pub trait Reporter: Send + Sync {
    fn batch_started(&self, _info: &BatchStartInfo) {}
    fn conversion_skipped(&self, _job: &ConversionJob) {}
    fn conversion_started(&self, _job: &ConversionJob) {}
    fn conversion_finished(&self, _outcome: &ConversionOutcome) {}
    fn batch_complete(&self, _summary: &BuildSummary) {}
    fn clean_complete(&self, _output_dir: &str, _removed: bool) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _error: &ReporterError) {}
}

/// No-op reporter that discards all updates.
pub struct NullReporter;

impl Reporter for NullReporter {}

pub(crate) fn format_duration(duration: &Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        return format!("{:.1}s", duration.as_secs_f64());
    }
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
