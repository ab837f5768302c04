// ============================================================================
// flebuild-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Conversion Driver
//
// This module defines the error taxonomy used across flebuild-core:
// - a missing converter is fatal and reported before anything is attempted
// - output directory and clean failures are fatal I/O errors
// - a converter that exits non-zero is a per-file conversion error carrying
//   the unchanged exit status and the converter's own stderr
//
// Each variant maps onto a process exit code via `CoreError::exit_code`.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Exit code for a build where one or more conversions failed.
pub const EXIT_CONVERSION_FAILED: i32 = 1;

/// Exit code for setup failures (missing tool, output directory, config).
pub const EXIT_SETUP_FAILED: i32 = 2;

/// Exit code for an interrupted build, following the shell convention.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Custom error types for flebuild-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Converter '{0}' not found on the execution path")]
    ToolMissing(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed while waiting for '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Cannot prepare output directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Conversion of '{}' failed ({})", source_file.display(), describe_status(*status))]
    ConversionFailed {
        source_file: PathBuf,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Conversion of '{}' was cancelled", .0.display())]
    Cancelled(PathBuf),

    #[error("Cannot remove output directory '{}': {source}", path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot read config file '{}': {message}", path.display())]
    ConfigFile { path: PathBuf, message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for flebuild-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Process exit code that corresponds to this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::ConversionFailed { .. } => EXIT_CONVERSION_FAILED,
            CoreError::Cancelled(_) => EXIT_INTERRUPTED,
            _ => EXIT_SETUP_FAILED,
        }
    }

    /// Returns true when the error means the converter binary could not be found.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, CoreError::ToolMissing(_))
    }
}

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Builds the error for a command that could not be spawned.
///
/// A spawn failure with `NotFound` means the converter is missing, which is
/// reported as `ToolMissing` rather than a generic start failure.
pub fn command_start_error(cmd_name: &str, err: io::Error) -> CoreError {
    if err.kind() == io::ErrorKind::NotFound {
        CoreError::ToolMissing(cmd_name.to_string())
    } else {
        CoreError::CommandStart(cmd_name.to_string(), err)
    }
}

pub fn command_wait_error(cmd_name: &str, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd_name.to_string(), err)
}

/// Builds the error for a converter run that exited unsuccessfully.
pub fn conversion_failed_error(
    source_file: impl Into<PathBuf>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::ConversionFailed {
        source_file: source_file.into(),
        status: status.code(),
        stderr: stderr.into(),
    }
}
