// ============================================================================
// flebuild-core/src/config/file.rs
// ============================================================================
//
// CONFIG FILE: Optional JSON configuration
//
// A `flebuild.json` next to the logbooks (or any file passed explicitly)
// can set the same keys as the command line. Every key is optional and
// unknown keys are rejected so typos do not go unnoticed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// File name picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "flebuild.json";

/// On-disk configuration. Absent keys fall back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub converter: Option<String>,
    pub jobs: Option<usize>,
    pub fail_fast: Option<bool>,
}

impl ConfigFile {
    /// Reads and parses a config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CoreError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &contents)
    }

    /// Loads `path` when given, otherwise `flebuild.json` in `dir` if it exists.
    ///
    /// An explicitly named file that is missing is an error; a missing
    /// default file is not.
    pub fn discover(path: Option<&Path>, dir: &Path) -> CoreResult<Option<Self>> {
        match path {
            Some(path) => Self::load(path).map(Some),
            None => {
                let default_path = dir.join(DEFAULT_CONFIG_FILE_NAME);
                if default_path.is_file() {
                    log::debug!("Using config file {}", default_path.display());
                    Self::load(&default_path).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn parse(path: &Path, contents: &str) -> CoreResult<Self> {
        serde_json::from_str(contents).map_err(|e| CoreError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_all_keys() {
        let contents = r#"{
            "source_dir": "logbooks",
            "output_dir": "exports",
            "converter": "/usr/local/bin/FLEcli",
            "jobs": 4,
            "fail_fast": true
        }"#;
        let file = ConfigFile::parse(Path::new("flebuild.json"), contents).unwrap();

        assert_eq!(file.source_dir, Some(PathBuf::from("logbooks")));
        assert_eq!(file.output_dir, Some(PathBuf::from("exports")));
        assert_eq!(file.converter.as_deref(), Some("/usr/local/bin/FLEcli"));
        assert_eq!(file.jobs, Some(4));
        assert_eq!(file.fail_fast, Some(true));
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let file = ConfigFile::parse(Path::new("flebuild.json"), "{}").unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ConfigFile::parse(Path::new("flebuild.json"), r#"{"outdir": "x"}"#)
            .unwrap_err();
        match err {
            CoreError::ConfigFile { path, message } => {
                assert_eq!(path, PathBuf::from("flebuild.json"));
                assert!(message.contains("outdir"));
            }
            e => panic!("Unexpected error type: {:?}", e),
        }
    }

    #[test]
    fn discover_without_default_file_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(ConfigFile::discover(None, dir.path()).unwrap(), None);
    }

    #[test]
    fn discover_picks_up_default_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE_NAME), r#"{"jobs": 1}"#).unwrap();

        let file = ConfigFile::discover(None, dir.path()).unwrap().unwrap();
        assert_eq!(file.jobs, Some(1));
    }

    #[test]
    fn discover_explicit_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(ConfigFile::discover(Some(&missing), dir.path()).is_err());
    }
}
