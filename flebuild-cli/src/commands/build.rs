//! Implementation of the `build` subcommand.

use crate::cli::{BuildArgs, GlobalArgs};
use crate::config::resolve_config;
use crate::error::CliResult;

use flebuild_core::error::{EXIT_CONVERSION_FAILED, EXIT_INTERRUPTED};
use flebuild_core::external::converter::format_command;
use flebuild_core::reporting::Reporter;
use flebuild_core::{CancellationToken, ProcessConverter, build_all, plan};

use log::info;
use std::path::Path;

/// Runs a build and returns the exit code.
pub fn run_build(
    global: &GlobalArgs,
    args: &BuildArgs,
    working_dir: &Path,
    reporter: &dyn Reporter,
    cancel: &CancellationToken,
) -> CliResult<i32> {
    let config = resolve_config(global, Some(args), working_dir)?;
    let converter = ProcessConverter::new(config.converter.clone());

    if args.dry_run {
        let build_plan = plan(&config)?;
        for job in build_plan.pending() {
            println!("{}", format_command(&converter.command(&job.source, &job.target)));
        }
        return Ok(0);
    }

    let summary = build_all(&config, &converter, reporter, cancel)?;

    if cancel.is_cancelled() {
        info!("Build interrupted");
        return Ok(EXIT_INTERRUPTED);
    }
    if !summary.is_success() {
        return Ok(EXIT_CONVERSION_FAILED);
    }
    Ok(0)
}
