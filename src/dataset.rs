//! Persisted pipeline artifacts
//!
//! Both artifacts are pretty-printed JSON arrays, overwritten in full on
//! every run.

use crate::document::{EmbeddedDocument, LinkOpportunity};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the embedded corpus inside the output directory
pub const PAGES_FILE: &str = "pages.json";

/// File name of the opportunity report inside the output directory
pub const OPPORTUNITIES_FILE: &str = "opportunities.json";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("{0} not found")]
    Missing(PathBuf),

    #[error("IO error on {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed JSON in {0}: {1}")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("failed to serialize {0}: {1}")]
    Serialize(PathBuf, #[source] serde_json::Error),
}

/// Serialize `value` with two-space indentation and replace `path` with it
///
/// The JSON is written to a sibling temp file first and renamed into place,
/// so readers never observe a partially written artifact.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DatasetError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DatasetError::Serialize(path.to_path_buf(), e))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, json).map_err(|e| DatasetError::Io(tmp.clone(), e))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        DatasetError::Io(path.to_path_buf(), e)
    })
}

/// Load a JSON artifact
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DatasetError::Missing(path.to_path_buf()));
        }
        Err(e) => return Err(DatasetError::Io(path.to_path_buf(), e)),
    };
    serde_json::from_str(&raw).map_err(|e| DatasetError::Parse(path.to_path_buf(), e))
}

pub fn read_pages(path: &Path) -> Result<Vec<EmbeddedDocument>, DatasetError> {
    read_json(path)
}

pub fn read_opportunities(path: &Path) -> Result<Vec<LinkOpportunity>, DatasetError> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_uses_two_space_indent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale").unwrap();

        write_json(&path, &vec![serde_json::json!({"a": 1})]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[\n  {\n    \"a\": 1\n  }\n]");
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[test]
    fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_pages(&dir.path().join(PAGES_FILE)).unwrap_err();
        assert!(matches!(err, DatasetError::Missing(_)));
    }

    #[test]
    fn test_read_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PAGES_FILE);
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_pages(&path), Err(DatasetError::Parse(..))));
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join(OPPORTUNITIES_FILE);
        let empty: Vec<LinkOpportunity> = Vec::new();
        assert!(matches!(write_json(&path, &empty), Err(DatasetError::Io(..))));
    }
}
