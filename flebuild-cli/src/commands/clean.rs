//! Implementation of the `clean` subcommand.

use crate::cli::GlobalArgs;
use crate::config::resolve_config;
use crate::error::CliResult;

use flebuild_core::reporting::Reporter;
use flebuild_core::{CleanOutcome, clean};

use std::path::Path;

/// Removes the output directory; an already-missing directory is success.
pub fn run_clean(global: &GlobalArgs, working_dir: &Path, reporter: &dyn Reporter) -> CliResult<i32> {
    let config = resolve_config(global, None, working_dir)?;
    let outcome = clean(&config)?;
    reporter.clean_complete(
        &config.output_dir.display().to_string(),
        outcome == CleanOutcome::Removed,
    );
    Ok(0)
}
