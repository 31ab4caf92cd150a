//! Languages manifest: the ordered list of languages and the reference language.
//!
//! The manifest lives next to the language directories as `languages.json`:
//!
//! ```json
//! { "reference": "en", "languages": ["en", {"code": "fr", "name": "French"}] }
//! ```
//!
//! `reference` is optional; when absent the configured default is used.

use crate::error::SyncError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// A validated language code.
///
/// Codes double as directory names, so anything that could escape the
/// i18n root (separators, `.` or `..`) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a LanguageCode from a manifest entry.
    pub fn parse(code: &str) -> Result<Self, SyncError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(SyncError::config("Language code must not be empty"));
        }
        if code == "." || code == ".." || code.contains(['/', '\\']) {
            return Err(SyncError::config(format!(
                "Language code '{}' is not a valid directory name",
                code
            )));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    code: LanguageCode,
    name: Option<String>,
}

impl Language {
    pub fn new(code: LanguageCode, name: Option<String>) -> Self {
        Self { code, name }
    }

    pub fn code(&self) -> &LanguageCode {
        &self.code
    }

    /// Name used when asking for a translation; falls back to the code.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.code.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    languages: Vec<ManifestEntry>,
    #[serde(default)]
    reference: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    Code(String),
    Detailed {
        code: String,
        #[serde(default)]
        name: Option<String>,
    },
}

/// Ordered languages plus the designated reference language.
#[derive(Debug, Clone)]
pub struct LanguageManifest {
    languages: Vec<Language>,
    reference: LanguageCode,
}

impl LanguageManifest {
    /// Read and validate the manifest at `path`.
    ///
    /// `default_reference` is used when the manifest does not name one.
    pub fn load(path: &Path, default_reference: &str) -> Result<Self, SyncError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::config(format!(
                "Failed to read languages manifest {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&content, default_reference).map_err(|e| match e {
            SyncError::Configuration(msg) => {
                SyncError::config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Parse a manifest from its JSON text.
    pub fn from_json(content: &str, default_reference: &str) -> Result<Self, SyncError> {
        let file: ManifestFile = serde_json::from_str(content)
            .map_err(|e| SyncError::config(format!("Invalid languages manifest: {}", e)))?;

        if file.languages.is_empty() {
            return Err(SyncError::config("Languages manifest lists no languages"));
        }

        let mut seen = HashSet::new();
        let mut languages = Vec::with_capacity(file.languages.len());
        for entry in file.languages {
            let (code, name) = match entry {
                ManifestEntry::Code(code) => (code, None),
                ManifestEntry::Detailed { code, name } => (code, name),
            };
            let code = LanguageCode::parse(&code)?;
            if !seen.insert(code.clone()) {
                return Err(SyncError::config(format!(
                    "Language '{}' is listed more than once",
                    code
                )));
            }
            languages.push(Language::new(code, name));
        }

        let reference =
            LanguageCode::parse(file.reference.as_deref().unwrap_or(default_reference))?;
        if !seen.contains(&reference) {
            return Err(SyncError::config(format!(
                "Reference language '{}' is not listed in the languages manifest",
                reference
            )));
        }

        Ok(Self {
            languages,
            reference,
        })
    }

    pub fn reference(&self) -> &LanguageCode {
        &self.reference
    }

    /// All languages in manifest order, reference included.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Languages to translate into, in manifest order.
    pub fn targets(&self) -> impl Iterator<Item = &Language> {
        self.languages
            .iter()
            .filter(move |lang| lang.code != self.reference)
    }
}
