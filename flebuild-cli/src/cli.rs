// flebuild-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use flebuild_core::{CoreError, CoreResult};

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable read by `--jobs`.
pub const JOBS_ENV: &str = "FLEBUILD_JOBS";

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "flebuild: FLE logbook to ADIF conversion driver",
    long_about = "Converts every src/*.fle logbook into out/*.adi by running FLEcli once per \
                  missing or out-of-date output. Runs `build` when no command is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Converts missing or out-of-date logbooks (default)
    Build(BuildArgs),
    /// Removes the output directory and everything in it
    Clean,
    /// Lists each logbook with the state of its output; exits 1 if any need converting
    Status,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory containing .fle logbooks [default: src]
    #[arg(long, global = true, value_name = "DIR", env = "FLEBUILD_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Directory receiving .adi files [default: out]
    #[arg(long, global = true, value_name = "DIR", env = "FLEBUILD_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Converter executable name or path [default: FLEcli]
    #[arg(long, global = true, value_name = "PATH", env = "FLEBUILD_CONVERTER")]
    pub converter: Option<String>,

    /// JSON config file (defaults to ./flebuild.json when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show progress and a summary; repeat for debug logging
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write a debug log file into this directory
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Emit line-delimited JSON progress events on stdout
    #[arg(long, global = true)]
    pub progress_json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Maximum number of concurrent conversions [default: number of CPUs]
    #[arg(short, long, value_name = "N", env = JOBS_ENV)]
    pub jobs: Option<usize>,

    /// Convert every logbook, even when its output is up to date
    #[arg(short = 'B', long)]
    pub force: bool,

    /// Stop starting new conversions after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the converter commands that would run without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Cli {
    /// The command to run; a bare invocation builds.
    ///
    /// Build flags only parse after `build`, so a bare invocation reads
    /// FLEBUILD_JOBS here and rejects a malformed value the same way.
    pub fn command_or_default(&self) -> CoreResult<Commands> {
        match &self.command {
            Some(command) => Ok(command.clone()),
            None => {
                let value = std::env::var_os(JOBS_ENV).map(|v| v.to_string_lossy().into_owned());
                let jobs = jobs_from_env(value.as_deref())?;
                Ok(Commands::Build(BuildArgs {
                    jobs,
                    ..BuildArgs::default()
                }))
            }
        }
    }
}

/// Parses a FLEBUILD_JOBS value; unset or empty means "not given".
pub fn jobs_from_env(value: Option<&str>) -> CoreResult<Option<usize>> {
    match value {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            CoreError::Config(format!(
                "invalid value '{raw}' for {JOBS_ENV}: expected a whole number"
            ))
        }),
    }
}
