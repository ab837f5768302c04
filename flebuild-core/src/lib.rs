//! Core library for converting FLE logbooks to ADIF with an external converter.
//!
//! This crate discovers `.fle` sources, decides which `.adi` targets are
//! missing or stale, and runs the FLEcli converter once per stale source on
//! a bounded worker pool. It also removes the output directory on request.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use flebuild_core::{BuildConfigBuilder, CancellationToken, ProcessConverter, build_all};
//! use flebuild_core::reporting::TerminalReporter;
//!
//! let config = BuildConfigBuilder::new()
//!     .source_dir("src")
//!     .output_dir("out")
//!     .jobs(4)
//!     .build()
//!     .unwrap();
//!
//! let converter = ProcessConverter::new(config.converter.clone());
//! let reporter = TerminalReporter::new(true);
//! let summary = build_all(&config, &converter, &reporter, &CancellationToken::new()).unwrap();
//! if !summary.is_success() {
//!     eprintln!("failed: {}", summary.failed_names().join(", "));
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod plan;
pub mod processing;
pub mod reporting;

// Re-exports for public API
pub use cancel::CancellationToken;
pub use config::{BuildConfig, BuildConfigBuilder, ConfigFile};
pub use discovery::{find_source_files, target_path_for};
pub use error::{CoreError, CoreResult};
pub use external::{Converter, ProcessConverter, check_dependency};
pub use plan::{BuildPlan, ConversionJob, Freshness, plan};
pub use processing::{CleanOutcome, build_all, clean, convert_one};
pub use reporting::{BuildSummary, Reporter};
