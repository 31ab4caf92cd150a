//! Reading and writing a single language's key/value JSON file.

use crate::error::SyncError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered key/value entries of one KeyFile.
pub type Entries = Map<String, Value>;

/// A language's KeyFile on disk, loaded for incremental updates.
#[derive(Debug)]
pub struct KeyFile {
    path: PathBuf,
    entries: Entries,
    existed: bool,
}

impl KeyFile {
    /// Open an existing KeyFile, or start from an empty mapping if it does not exist
    pub fn open_or_create(path: &Path) -> Result<Self, SyncError> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                entries: Map::new(),
                existed: false,
            });
        }

        let content = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
        let entries = parse_object(&content).map_err(|source| SyncError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            existed: true,
        })
    }

    pub fn existed(&self) -> bool {
        self.existed
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    /// Whether `key` already holds a usable value
    pub fn has_value(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(is_filled)
    }

    /// Whether `key` needs no work: it is filled, or it already holds the
    /// blank reference text it was copied from.
    pub fn is_settled(&self, key: &str, reference_text: &str) -> bool {
        self.has_value(key)
            || self.entries.get(key).and_then(Value::as_str) == Some(reference_text)
    }

    /// Store a value for a missing key. Filled keys are never overwritten.
    ///
    /// Returns `true` if the file content changed.
    pub fn fill(&mut self, key: &str, value: String) -> bool {
        if self.has_value(key) {
            return false;
        }
        if self.entries.get(key).and_then(Value::as_str) == Some(value.as_str()) {
            return false;
        }
        self.entries.insert(key.to_string(), Value::String(value));
        true
    }

    /// Save with 2-space indentation and a trailing newline, creating parent directories
    pub fn save(&self) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
        }

        let content = to_pretty_json(&self.entries).map_err(|source| SyncError::Json {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, content).map_err(|e| SyncError::io(&self.path, e))
    }
}

/// A value counts as present unless it is absent-like: `null`, `""`, `false` or `0`.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse text that must contain a JSON object
pub(crate) fn parse_object(content: &str) -> Result<Entries, serde_json::Error> {
    serde_json::from_str::<Entries>(content)
}

pub(crate) fn to_pretty_json(entries: &Entries) -> Result<String, serde_json::Error> {
    let mut content = serde_json::to_string_pretty(entries)?;
    content.push('\n');
    Ok(content)
}
