// flebuild-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use super::Converter;
use crate::cancel::CancellationToken;
use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Scripted result for one source file name.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Exit with this status, optionally leaving a partial target behind.
    Fail { status: i32, stderr: String, partial_output: bool },
    /// Report cancellation as if interrupted mid-run.
    Cancel,
}

/// In-process converter that writes the source bytes to the target.
#[derive(Default)]
pub struct MockConverter {
    missing: bool,
    behaviors: Mutex<HashMap<String, MockBehavior>>,
    received_calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl MockConverter {
    pub fn new() -> Self {
        Default::default()
    }

    /// A converter whose executable cannot be found.
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Default::default()
        }
    }

    pub fn fail_on(&self, source_name: &str, status: i32, stderr: &str) {
        self.behaviors.lock().unwrap().insert(
            source_name.to_string(),
            MockBehavior::Fail {
                status,
                stderr: stderr.to_string(),
                partial_output: false,
            },
        );
    }

    pub fn fail_with_partial_output(&self, source_name: &str) {
        self.behaviors.lock().unwrap().insert(
            source_name.to_string(),
            MockBehavior::Fail {
                status: 1,
                stderr: "truncated".to_string(),
                partial_output: true,
            },
        );
    }

    pub fn cancel_on(&self, source_name: &str) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(source_name.to_string(), MockBehavior::Cancel);
    }

    /// (source, target) pairs in call order.
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.received_calls.lock().unwrap().clone()
    }

    /// Source file names in call order.
    pub fn called_names(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|(source, _)| source.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}

impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock-flecli"
    }

    fn ensure_available(&self) -> CoreResult<()> {
        if self.missing {
            Err(CoreError::ToolMissing(self.name().to_string()))
        } else {
            Ok(())
        }
    }

    fn convert(&self, source: &Path, target: &Path, _cancel: &CancellationToken) -> CoreResult<()> {
        if self.missing {
            return Err(CoreError::ToolMissing(self.name().to_string()));
        }
        self.received_calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), target.to_path_buf()));

        let name = source.file_name().unwrap().to_string_lossy().into_owned();
        let behavior = self.behaviors.lock().unwrap().get(&name).cloned();
        match behavior {
            None => {
                fs::copy(source, target)?;
                Ok(())
            }
            Some(MockBehavior::Fail {
                status,
                stderr,
                partial_output,
            }) => {
                if partial_output {
                    fs::write(target, "<EOH>\npartial")?;
                }
                Err(CoreError::ConversionFailed {
                    source_file: source.to_path_buf(),
                    status: Some(status),
                    stderr,
                })
            }
            Some(MockBehavior::Cancel) => {
                fs::write(target, "partial")?;
                Err(CoreError::Cancelled(source.to_path_buf()))
            }
        }
    }
}
