//! File discovery module for finding logbook sources to convert.
//!
//! Sources are the `.fle` files directly inside the source directory; the
//! search does not descend into subdirectories. Matching follows a shell
//! `*.fle` glob: the suffix is case-sensitive and hidden files are skipped.

use crate::config::{SOURCE_EXTENSION, TARGET_EXTENSION};
use crate::error::{CoreError, CoreResult};

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

/// Finds logbook sources in the specified directory, sorted by file name.
///
/// A missing directory or a directory with no `.fle` files yields an empty
/// list; having nothing to convert is not an error.
///
/// # Examples
///
/// ```rust,no_run
/// use flebuild_core::find_source_files;
/// use std::path::Path;
///
/// let sources = find_source_files(Path::new("src")).unwrap();
/// for source in sources {
///     println!("{}", source.display());
/// }
/// ```
pub fn find_source_files(source_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let read_dir = match std::fs::read_dir(source_dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Source directory {} does not exist", source_dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(CoreError::Io(e)),
    };

    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!(
                        "Skipping unreadable entry in {}: {}",
                        source_dir.display(),
                        e
                    );
                    return None;
                }
            };
            let path = entry.path();

            if !path.is_file() || !is_source_file(&path) {
                return None;
            }
            Some(path)
        })
        .collect();

    files.sort();
    log::debug!(
        "Found {} source file(s) in {}",
        files.len(),
        source_dir.display()
    );
    Ok(files)
}

/// Checks whether the path names a logbook source by its file name alone.
#[must_use]
pub fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    if name.as_encoded_bytes().starts_with(b".") {
        return false;
    }
    path.extension() == Some(OsStr::new(SOURCE_EXTENSION))
}

/// Maps a source file to its output path: `<output_dir>/<basename>.adi`.
pub fn target_path_for(source: &Path, output_dir: &Path) -> CoreResult<PathBuf> {
    let stem = source.file_stem().ok_or_else(|| {
        CoreError::InvalidPath(format!(
            "Cannot derive an output name from '{}'",
            source.display()
        ))
    })?;

    let mut target = output_dir.join(stem);
    target.set_extension(TARGET_EXTENSION);
    Ok(target)
}
