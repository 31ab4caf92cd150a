//! Canonical key set built from the reference language's KeyFiles.

use crate::error::SyncError;
use crate::i18n::key_file::{parse_object, Entries};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One reference KeyFile: its file name and flat key → text entries.
#[derive(Debug, Clone)]
pub struct ReferenceFile {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

/// A key defined by more than one reference KeyFile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    pub key: String,
    pub first_file: String,
    pub overriding_file: String,
}

/// The reference language's KeyFiles plus the merged canonical mapping.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    files: Vec<ReferenceFile>,
    merged: Entries,
    collisions: Vec<KeyCollision>,
}

impl ReferenceSet {
    /// Load every `*.json` file in `dir`, in file-name order.
    ///
    /// Keys are merged last-write-wins; a key keeps the position of its first
    /// occurrence. Collisions are logged and kept in [`ReferenceSet::collisions`].
    pub fn load(dir: &Path) -> Result<Self, SyncError> {
        let read_dir = fs::read_dir(dir).map_err(|e| {
            SyncError::config(format!(
                "Failed to read reference directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| {
                SyncError::config(format!("Failed to list {}: {}", dir.display(), e))
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        let mut files = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(&name);
            let content = fs::read_to_string(&path).map_err(|e| {
                SyncError::config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let entries = parse_reference_entries(&content)
                .map_err(|msg| SyncError::config(format!("{}: {}", path.display(), msg)))?;
            debug!("Loaded {} keys from {}", entries.len(), path.display());
            files.push(ReferenceFile { name, entries });
        }

        Ok(Self::from_files(files))
    }

    /// Build the merged mapping from already parsed files.
    pub fn from_files(files: Vec<ReferenceFile>) -> Self {
        let mut merged = Entries::new();
        let mut origin: HashMap<String, String> = HashMap::new();
        let mut collisions = Vec::new();

        for file in &files {
            for (key, text) in &file.entries {
                if let Some(previous) = origin.insert(key.clone(), file.name.clone()) {
                    if previous != file.name {
                        warn!(
                            "Key '{}' is defined in both {} and {}; using the value from {}",
                            key, previous, file.name, file.name
                        );
                        collisions.push(KeyCollision {
                            key: key.clone(),
                            first_file: previous,
                            overriding_file: file.name.clone(),
                        });
                    }
                }
                merged.insert(key.clone(), Value::String(text.clone()));
            }
        }

        Self {
            files,
            merged,
            collisions,
        }
    }

    pub fn files(&self) -> &[ReferenceFile] {
        &self.files
    }

    /// Canonical key → reference text, in merge order.
    pub fn merged(&self) -> &Entries {
        &self.merged
    }

    /// Canonical keys in merge order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.merged.keys().map(String::as_str)
    }

    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }
}

/// A reference file must be a flat object of strings.
fn parse_reference_entries(content: &str) -> Result<Vec<(String, String)>, String> {
    let object = parse_object(content).map_err(|e| format!("invalid JSON object: {}", e))?;

    object
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => Ok((key, text)),
            other => Err(format!(
                "value of key '{}' must be a string, found {}",
                key, other
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_merges_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "errors.json", r#"{"notFound": "Not found"}"#);
        write(dir.path(), "common.json", r#"{"hello": "Hello", "bye": "Bye"}"#);
        write(dir.path(), "notes.txt", "ignored");

        let set = ReferenceSet::load(dir.path()).unwrap();

        let names: Vec<_> = set.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["common.json", "errors.json"]);

        let keys: Vec<_> = set.keys().collect();
        assert_eq!(keys, vec!["hello", "bye", "notFound"]);
        assert!(set.collisions().is_empty());
    }

    #[test]
    fn test_file_keeps_its_own_key_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "common.json", r#"{"zeta": "Z", "alpha": "A"}"#);

        let set = ReferenceSet::load(dir.path()).unwrap();
        let keys: Vec<_> = set.files()[0].entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_collision_last_write_wins() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", r#"{"title": "First", "other": "x"}"#);
        write(dir.path(), "b.json", r#"{"title": "Second"}"#);

        let set = ReferenceSet::load(dir.path()).unwrap();

        assert_eq!(set.merged()["title"], "Second");
        // Keeps the position of the first occurrence
        let keys: Vec<_> = set.keys().collect();
        assert_eq!(keys, vec!["title", "other"]);
        assert_eq!(
            set.collisions(),
            &[KeyCollision {
                key: "title".to_string(),
                first_file: "a.json".to_string(),
                overriding_file: "b.json".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_directory_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let err = ReferenceSet::load(&dir.path().join("en")).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "common.json", "{not json");

        let err = ReferenceSet::load(dir.path()).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.to_string().contains("common.json"));
    }

    #[test]
    fn test_non_string_value_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "common.json", r#"{"count": 3}"#);

        let err = ReferenceSet::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("count"));
    }

    #[test]
    fn test_empty_directory_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        let set = ReferenceSet::load(dir.path()).unwrap();
        assert!(set.files().is_empty());
        assert!(set.merged().is_empty());
    }
}
