// flebuild-cli/src/config.rs
//
// Resolves the effective BuildConfig. Precedence, highest first:
// command-line flag, environment variable (via clap `env`), config file,
// built-in default. Relative paths are taken relative to the working
// directory, wherever the config file lives.

use crate::cli::{BuildArgs, GlobalArgs};
use crate::error::CliResult;

use flebuild_core::{BuildConfig, BuildConfigBuilder, ConfigFile};
use std::path::Path;

/// Builds and validates the config for one invocation.
pub fn resolve_config(
    global: &GlobalArgs,
    build: Option<&BuildArgs>,
    working_dir: &Path,
) -> CliResult<BuildConfig> {
    let file = ConfigFile::discover(global.config.as_deref(), working_dir)?;
    let mut builder = file
        .as_ref()
        .map(BuildConfigBuilder::from_file)
        .unwrap_or_default();

    if let Some(dir) = &global.source_dir {
        builder = builder.source_dir(dir.clone());
    }
    if let Some(dir) = &global.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if let Some(converter) = &global.converter {
        builder = builder.converter(converter.clone());
    }

    if let Some(args) = build {
        if let Some(jobs) = args.jobs {
            builder = builder.jobs(jobs);
        }
        if args.force {
            builder = builder.force(true);
        }
        if args.fail_fast {
            builder = builder.fail_fast(true);
        }
    }

    let config = builder.build()?;
    log::debug!("Effective config: {:?}", config);
    Ok(config)
}
