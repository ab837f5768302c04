use super::{
    BatchStartInfo, BuildSummary, ConversionOutcome, OutcomeStatus, Reporter, ReporterError,
};
use crate::plan::ConversionJob;

use serde_json::json;
use std::io::{self, Write};
use std::sync::Mutex;

/// Line-delimited JSON reporter for machine consumers.
///
/// Every event is one JSON object per line carrying a `type` and an RFC 3339
/// `timestamp`.
pub struct JsonReporter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn timestamp() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    fn write_value(&self, mut value: serde_json::Value) {
        if let Some(obj) = value.as_object_mut() {
            obj.insert("timestamp".to_string(), json!(Self::timestamp()));
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", value);
            let _ = writer.flush();
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for JsonReporter {
    fn batch_started(&self, info: &BatchStartInfo) {
        self.write_value(json!({
            "type": "batch_started",
            "total_sources": info.total_sources,
            "pending": info.pending,
            "up_to_date": info.up_to_date,
            "output_dir": info.output_dir,
            "jobs": info.jobs,
            "forced": info.forced,
        }));
    }

    fn conversion_skipped(&self, job: &ConversionJob) {
        self.write_value(json!({
            "type": "conversion_skipped",
            "source": job.source.display().to_string(),
            "target": job.target.display().to_string(),
        }));
    }

    fn conversion_started(&self, job: &ConversionJob) {
        self.write_value(json!({
            "type": "conversion_started",
            "source": job.source.display().to_string(),
            "target": job.target.display().to_string(),
            "reason": job.freshness.as_str(),
        }));
    }

    fn conversion_finished(&self, outcome: &ConversionOutcome) {
        let mut value = json!({
            "type": "conversion_finished",
            "source": outcome.source.display().to_string(),
            "target": outcome.target.display().to_string(),
            "duration_seconds": outcome.duration.as_secs_f64(),
        });
        let (result, failure) = match &outcome.status {
            OutcomeStatus::Converted => ("converted", None),
            OutcomeStatus::Failed(failure) => ("failed", Some(failure)),
            OutcomeStatus::NotRun => ("not_run", None),
        };
        if let Some(obj) = value.as_object_mut() {
            obj.insert("result".to_string(), json!(result));
            if let Some(failure) = failure {
                obj.insert("message".to_string(), json!(failure.message));
                obj.insert("exit_status".to_string(), json!(failure.status));
                obj.insert("output".to_string(), json!(failure.output));
            }
        }
        self.write_value(value);
    }

    fn batch_complete(&self, summary: &BuildSummary) {
        self.write_value(json!({
            "type": "batch_complete",
            "success": summary.is_success(),
            "total_sources": summary.total_sources,
            "converted": summary.converted,
            "skipped": summary.skipped,
            "failed": summary.failed_names(),
            "not_run": summary.not_run,
            "duration_seconds": summary.duration.as_secs_f64(),
        }));
    }

    fn clean_complete(&self, output_dir: &str, removed: bool) {
        self.write_value(json!({
            "type": "clean_complete",
            "output_dir": output_dir,
            "removed": removed,
        }));
    }

    fn warning(&self, message: &str) {
        self.write_value(json!({
            "type": "warning",
            "message": message,
        }));
    }

    fn error(&self, error: &ReporterError) {
        self.write_value(json!({
            "type": "error",
            "title": error.title,
            "message": error.message,
            "suggestion": error.suggestion,
        }));
    }
}
