//! Configuration structures and constants for the flebuild-core library.
//!
//! The source directory, output directory and converter are explicit
//! configuration rather than ambient working-directory state. `BuildConfig`
//! is created by consumers (like flebuild-cli) and passed to the driver.

mod builder;
mod file;

use std::path::{Component, Path, PathBuf};

use crate::error::{CoreError, CoreResult};

pub use builder::BuildConfigBuilder;
pub use file::{ConfigFile, DEFAULT_CONFIG_FILE_NAME};

// Default constants

/// Default directory scanned for logbook sources.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Default directory that receives converted files.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Default converter executable, looked up on the execution path.
pub const DEFAULT_CONVERTER: &str = "FLEcli";

/// Extension of logbook source files (without the dot).
pub const SOURCE_EXTENSION: &str = "fle";

/// Extension of converted ADIF files (without the dot).
pub const TARGET_EXTENSION: &str = "adi";

/// Converter subcommand that produces ADIF output.
pub const CONVERTER_SUBCOMMAND: &str = "adif";

/// Default number of concurrent conversions: one per logical CPU.
pub fn default_jobs() -> usize {
    num_cpus::get().max(1)
}

/// Main configuration structure for the conversion driver.
///
/// All fields have defaults matching the conventional `src/` and `out/`
/// layout, so a default config converts `src/*.fle` into `out/*.adi`.
///
/// # Examples
///
/// ```rust
/// use flebuild_core::config::BuildConfigBuilder;
///
/// let config = BuildConfigBuilder::new()
///     .source_dir("logs")
///     .output_dir("adif")
///     .jobs(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.jobs, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory scanned (non-recursively) for `.fle` sources
    pub source_dir: PathBuf,

    /// Directory where `.adi` outputs are written; created on demand
    pub output_dir: PathBuf,

    /// Converter executable name or path
    pub converter: String,

    /// Maximum number of concurrent converter processes
    pub jobs: usize,

    /// Convert every source even when its output is up to date
    pub force: bool,

    /// Stop starting new conversions after the first failure
    pub fail_fast: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            converter: DEFAULT_CONVERTER.to_string(),
            jobs: default_jobs(),
            force: false,
            fail_fast: false,
        }
    }
}

impl BuildConfig {
    /// Creates config with the given directories. Other fields use defaults.
    pub fn new(source_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            source_dir,
            output_dir,
            ..Default::default()
        }
    }

    /// Validates worker count, converter name and directory layout.
    pub fn validate(&self) -> CoreResult<()> {
        if self.jobs == 0 {
            return Err(CoreError::Config("jobs must be at least 1".to_string()));
        }

        if self.converter.trim().is_empty() {
            return Err(CoreError::Config(
                "converter must not be empty".to_string(),
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(CoreError::Config(
                "output_dir must not be empty".to_string(),
            ));
        }

        // `clean` removes the output directory wholesale, so it must never be
        // the source directory or one of its ancestors.
        let source = resolve_dir(&self.source_dir);
        let output = resolve_dir(&self.output_dir);
        if source == output {
            return Err(CoreError::Config(format!(
                "source_dir and output_dir must differ, both are '{}'",
                output.display()
            )));
        }
        if source.starts_with(&output) {
            return Err(CoreError::Config(format!(
                "output_dir '{}' must not contain source_dir '{}'",
                self.output_dir.display(),
                self.source_dir.display()
            )));
        }

        Ok(())
    }
}

/// Absolute, normalized form of a directory for comparison.
///
/// `.` and `..` are resolved lexically, then the deepest existing ancestor is
/// canonicalized so symlinks and not-yet-created directories compare alike.
pub(crate) fn resolve_dir(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    for ancestor in normalized.ancestors() {
        if let Ok(canonical) = ancestor.canonicalize() {
            return match normalized.strip_prefix(ancestor) {
                Ok(rest) if !rest.as_os_str().is_empty() => canonical.join(rest),
                _ => canonical,
            };
        }
    }
    normalized
}
