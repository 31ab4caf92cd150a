//! Error types shared by the loader, emitter and synchronizer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Manifest, reference directory, types file or environment is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The types file has no previously generated declaration to replace
    #[error("No `export type {type_name}` declaration found in {}", .path.display())]
    DeclarationNotFound { type_name: String, path: PathBuf },

    /// Reading or writing a language file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing language file is not a JSON object
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        SyncError::Configuration(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Per-key translation failures. These never abort a run; the synchronizer
/// falls back to the reference text.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Network or transport failure
    #[error("Translation request failed: {0}")]
    Request(String),

    /// Provider answered with a non-success status
    #[error("Translation API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Provider answered without any usable text
    #[error("Translation response was empty")]
    EmptyResponse,

    /// Provider apologized or refused instead of translating
    #[error("Translation refused: {0}")]
    Refusal(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        TranslateError::Request(err.to_string())
    }
}
