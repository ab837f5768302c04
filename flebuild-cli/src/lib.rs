// flebuild-cli/src/lib.rs
//
// Library portion of the flebuild CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{BuildArgs, Cli, Commands, GlobalArgs};
pub use commands::build::run_build;
pub use commands::clean::run_clean;
pub use commands::status::run_status;
