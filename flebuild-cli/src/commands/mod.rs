//! Command implementations for the CLI.
//!
//! Each submodule implements one subcommand and returns the process exit code.

/// `build`: convert missing or out-of-date logbooks.
pub mod build;

/// `clean`: remove the output directory.
pub mod clean;

/// `status`: list logbooks with the state of their outputs.
pub mod status;
