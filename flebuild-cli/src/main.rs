//! Main entry point for the flebuild CLI application.
//!
//! Parses arguments, sets up logging and the interrupt handler, dispatches to
//! the command handlers, and turns the outcome into a process exit code.

use flebuild_cli::error::{CliErrorContext, CliResult, suggestion_for};
use flebuild_cli::logging::{console_level, init_logging, log_file_path};
use flebuild_cli::{Cli, Commands, run_build, run_clean, run_status};
use flebuild_core::CancellationToken;
use flebuild_core::reporting::{JsonReporter, Reporter, ReporterError, TerminalReporter};

use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    let reporter: Box<dyn Reporter> = if cli.global.progress_json {
        Box::new(JsonReporter::new())
    } else {
        Box::new(TerminalReporter::new(cli.global.verbose > 0))
    };

    let code = match run(&cli, reporter.as_ref()) {
        Ok(code) => code,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            reporter.error(&ReporterError {
                title: "flebuild failed".to_string(),
                message: e.to_string(),
                suggestion: suggestion_for(&e),
            });
            e.exit_code()
        }
    };

    process::exit(code);
}

fn run(cli: &Cli, reporter: &dyn Reporter) -> CliResult<i32> {
    let command = cli.command_or_default()?;
    let command_name = match &command {
        Commands::Build(_) => "build",
        Commands::Clean => "clean",
        Commands::Status => "status",
    };

    let log_file = cli
        .global
        .log_dir
        .as_deref()
        .map(|dir| log_file_path(dir, command_name));
    init_logging(
        console_level(cli.global.verbose, cli.global.quiet),
        log_file.as_deref(),
    )?;
    if let Some(path) = &log_file {
        log::info!("Logging to {}", path.display());
    }

    let working_dir =
        std::env::current_dir().cli_context("Failed to determine the working directory")?;

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        reporter.warning(&format!("Interrupt handling unavailable: {e}"));
    }

    match command {
        Commands::Build(args) => run_build(&cli.global, &args, &working_dir, reporter, &cancel),
        Commands::Clean => run_clean(&cli.global, &working_dir, reporter),
        Commands::Status => run_status(&cli.global, &working_dir),
    }
}
