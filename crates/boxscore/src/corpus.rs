//! JSON corpus files: reading and atomic writing of record lists.

use crate::error::{BoxscoreError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::model::GameRecord;

/// Read a JSON array of game records.
pub fn read_records(path: &Path) -> Result<Vec<GameRecord>> {
    read_json(path)
}

/// Write a JSON array of game records atomically.
pub fn write_records(path: &Path, records: &[GameRecord]) -> Result<()> {
    write_json_atomic(path, records)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| BoxscoreError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| BoxscoreError::json(path, e))
}

/// Pretty-print `value` to a sibling temp file, then rename it over `path`.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BoxscoreError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| BoxscoreError::json(path, e))?;
    let tmp = temp_path(path);
    std::fs::write(&tmp, json).map_err(|e| BoxscoreError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| BoxscoreError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
