//! Conversion orchestration.
//!
//! `driver` holds the three operations of the conversion driver: building
//! every stale target, converting a single file, and cleaning the output
//! directory.

/// Build, single-file conversion and clean operations
pub mod driver;

pub use driver::{CleanOutcome, build_all, clean, convert_one, ensure_output_dir};
