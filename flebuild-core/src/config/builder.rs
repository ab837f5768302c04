// ============================================================================
// flebuild-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for BuildConfig
//
// Fluent construction of BuildConfig instances. Unset fields keep the
// defaults from BuildConfig::default(); `build` validates the result.

use std::path::PathBuf;

use super::{BuildConfig, ConfigFile};
use crate::error::CoreResult;

/// Builder for creating BuildConfig instances.
///
/// # Examples
///
/// ```rust
/// use flebuild_core::config::BuildConfigBuilder;
///
/// let config = BuildConfigBuilder::new()
///     .source_dir("src")
///     .output_dir("out")
///     .converter("/opt/fle/FLEcli")
///     .force(true)
///     .build()
///     .unwrap();
/// assert!(config.force);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildConfigBuilder {
    config: BuildConfig,
}

impl BuildConfigBuilder {
    /// Creates a new builder seeded with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a builder from a loaded config file. Keys absent from the file
    /// keep their defaults.
    pub fn from_file(file: &ConfigFile) -> Self {
        let mut builder = Self::new();
        if let Some(dir) = &file.source_dir {
            builder = builder.source_dir(dir.clone());
        }
        if let Some(dir) = &file.output_dir {
            builder = builder.output_dir(dir.clone());
        }
        if let Some(converter) = &file.converter {
            builder = builder.converter(converter.clone());
        }
        if let Some(jobs) = file.jobs {
            builder = builder.jobs(jobs);
        }
        if let Some(fail_fast) = file.fail_fast {
            builder = builder.fail_fast(fail_fast);
        }
        builder
    }

    /// Sets the directory scanned for `.fle` sources.
    pub fn source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.config.source_dir = source_dir.into();
        self
    }

    /// Sets the directory receiving `.adi` outputs.
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Sets the converter executable name or path.
    pub fn converter(mut self, converter: impl Into<String>) -> Self {
        self.config.converter = converter.into();
        self
    }

    /// Sets the maximum number of concurrent conversions.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.config.force = force;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.fail_fast = fail_fast;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> CoreResult<BuildConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
