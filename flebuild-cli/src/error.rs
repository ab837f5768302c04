// ============================================================================
// flebuild-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses CoreError so every failure carries an exit code; this module
// adds context helpers for CLI-only operations (log files, working directory).

use flebuild_core::{CoreError, CoreResult};

use std::fmt;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Extension trait for adding context to errors in the CLI.
///
/// Similar to anyhow's context methods but produces a CoreError.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;

    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", context, core_error))
        })
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", f(), core_error))
        })
    }
}

/// Suggestion shown under an error, when there is an obvious fix.
pub fn suggestion_for(error: &CoreError) -> Option<String> {
    match error {
        CoreError::ToolMissing(name) => Some(format!(
            "Install {name} or point --converter (FLEBUILD_CONVERTER) at the executable"
        )),
        CoreError::OutputDir { .. } => {
            Some("Check permissions and free space, or choose another --output-dir".to_string())
        }
        CoreError::ConfigFile { .. } => {
            Some("Valid keys: source_dir, output_dir, converter, jobs, fail_fast".to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flebuild_core::error::EXIT_SETUP_FAILED;
    use std::io;

    #[test]
    fn context_wraps_io_errors() {
        let result: Result<(), io::Error> = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        let err = result.cli_context("Failed to open log file").unwrap_err();
        assert!(err.to_string().starts_with("Failed to open log file: "));
        assert_eq!(err.exit_code(), EXIT_SETUP_FAILED);
    }

    #[test]
    fn missing_tool_has_a_suggestion() {
        let err = CoreError::ToolMissing("FLEcli".to_string());
        assert!(suggestion_for(&err).unwrap().contains("--converter"));
    }
}
