//! Implementation of the `status` subcommand.
//!
//! Prints one line per logbook and exits 1 when anything would be converted,
//! so scripts can ask "is out/ current?" without running the converter.

use crate::cli::GlobalArgs;
use crate::config::resolve_config;
use crate::error::CliResult;

use flebuild_core::error::EXIT_CONVERSION_FAILED;
use flebuild_core::{BuildPlan, Freshness, plan};

use console::style;
use std::path::Path;

pub fn run_status(global: &GlobalArgs, working_dir: &Path) -> CliResult<i32> {
    let config = resolve_config(global, None, working_dir)?;
    let build_plan = plan(&config)?;

    for line in render_status(&build_plan) {
        println!("{line}");
    }

    if build_plan.pending().is_empty() {
        Ok(0)
    } else {
        Ok(EXIT_CONVERSION_FAILED)
    }
}

/// One line per job: `<state>  <source> -> <target>`.
pub fn render_status(build_plan: &BuildPlan) -> Vec<String> {
    build_plan
        .jobs
        .iter()
        .map(|job| {
            let state = format!("{:<10}", job.freshness.as_str());
            let state = match job.freshness {
                Freshness::UpToDate => style(state).green(),
                Freshness::Stale => style(state).yellow(),
                Freshness::Missing => style(state).red(),
            };
            format!(
                "{} {} -> {}",
                state,
                job.source.display(),
                job.target.display()
            )
        })
        .collect()
}
