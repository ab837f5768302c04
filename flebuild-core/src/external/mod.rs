// ============================================================================
// flebuild-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interaction with the FLEcli Converter
//
// This module encapsulates the only external collaborator of the driver: the
// converter executable. The driver talks to it through the `Converter` trait
// so tests can substitute an in-process implementation.
//
// KEY COMPONENTS:
// - Converter: trait for checking availability and converting one file
// - ProcessConverter: runs `<tool> adif -o <source> <target>` as a subprocess
// - check_dependency: resolves the converter on the execution path
//
// The converter is opaque: only its exit status is interpreted. Its output
// is captured, logged at debug level, and handed back verbatim on failure.

use crate::cancel::CancellationToken;
use crate::error::{CoreError, CoreResult};

use std::env;
use std::path::{Path, PathBuf};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Subprocess-backed converter implementation
pub mod converter;

#[cfg(test)]
pub(crate) mod mocks;

pub use converter::ProcessConverter;

// ============================================================================
// CONVERTER ABSTRACTION
// ============================================================================

/// Something that turns one logbook source into one ADIF target.
///
/// Implementations must be shareable across worker threads; the driver calls
/// `convert` concurrently for distinct source/target pairs.
pub trait Converter: Send + Sync {
    /// Name used in messages (the executable name for subprocess converters).
    fn name(&self) -> &str;

    /// Verifies the converter can be launched, without converting anything.
    fn ensure_available(&self) -> CoreResult<()>;

    /// Converts `source` into `target`, blocking until the conversion ends.
    ///
    /// Returns `CoreError::Cancelled` when `cancel` fires mid-conversion.
    fn convert(&self, source: &Path, target: &Path, cancel: &CancellationToken) -> CoreResult<()>;
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Resolves a command to the executable that would be launched for it.
///
/// Names containing a path separator are checked directly; bare names are
/// searched for in every `PATH` entry. Nothing is executed.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The resolved executable path
/// * `Err(CoreError::ToolMissing)` - If no executable matches
pub fn check_dependency(cmd_name: &str) -> CoreResult<PathBuf> {
    let cmd_path = Path::new(cmd_name);

    let has_dir = cmd_path
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty());
    if has_dir {
        return if is_executable(cmd_path) {
            log::debug!("Found dependency at explicit path: {}", cmd_name);
            Ok(cmd_path.to_path_buf())
        } else {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::ToolMissing(cmd_name.to_string()))
        };
    }

    let search_path = env::var_os("PATH").unwrap_or_default();
    for dir in env::split_paths(&search_path) {
        for candidate in candidate_names(cmd_name) {
            let full = dir.join(&candidate);
            if is_executable(&full) {
                log::debug!("Found dependency on PATH: {}", full.display());
                return Ok(full);
            }
        }
    }

    log::warn!("Dependency '{}' not found.", cmd_name);
    Err(CoreError::ToolMissing(cmd_name.to_string()))
}

fn candidate_names(cmd_name: &str) -> Vec<String> {
    let mut names = vec![cmd_name.to_string()];
    let suffix = env::consts::EXE_SUFFIX;
    if !suffix.is_empty() && !cmd_name.ends_with(suffix) {
        names.push(format!("{cmd_name}{suffix}"));
    }
    names
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
