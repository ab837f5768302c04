// ============================================================================
// flebuild-cli/src/logging.rs
// ============================================================================
//
// LOGGING: fern dispatch for console and optional file output
//
// Console output goes to stderr and stays at `warn` unless asked otherwise,
// so a successful build prints nothing. A log file, when requested, always
// records at `debug`, including the converter's captured output.

use crate::error::{CliErrorContext, CliResult};

use console::style;
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("flebuild_build_{}.log", flebuild_cli::logging::get_timestamp());
/// assert!(log_filename.ends_with(".log"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Maps -q / -v flags to the console log level.
pub fn console_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Path of the log file for one run of `command`.
pub fn log_file_path(log_dir: &Path, command: &str) -> PathBuf {
    log_dir.join(format!("flebuild_{}_{}.log", command, get_timestamp()))
}

/// Installs the global logger.
pub fn init_logging(console: LevelFilter, log_file: Option<&Path>) -> CliResult<()> {
    let console_dispatch = fern::Dispatch::new()
        .level(console)
        .format(|out, message, record| {
            let level = match record.level() {
                log::Level::Error => style("error").red().bold(),
                log::Level::Warn => style("warn").yellow().bold(),
                log::Level::Info => style("info").green(),
                log::Level::Debug => style("debug").blue(),
                log::Level::Trace => style("trace").magenta(),
            };
            out.finish(format_args!("flebuild {}: {}", level, message))
        })
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new().chain(console_dispatch);
    let mut max_level = console;

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).cli_with_context(|| {
                format!("Failed to create log directory {}", parent.display())
            })?;
        }
        let file = fern::log_file(path)
            .cli_with_context(|| format!("Failed to open log file {}", path.display()))?;
        let file_dispatch = fern::Dispatch::new()
            .level(LevelFilter::Debug)
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] {}: {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(file);
        root = root.chain(file_dispatch);
        max_level = max_level.max(LevelFilter::Debug);
    }

    root.level(max_level)
        .apply()
        .map_err(|e| flebuild_core::CoreError::OperationFailed(format!("Failed to initialise logging: {e}")))
}
