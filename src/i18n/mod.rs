//! Localized string tables on disk.
//!
//! # Architecture
//!
//! - `language`: languages manifest and validated language codes
//! - `key_set`: canonical key set merged from the reference KeyFiles
//! - `key_file`: one language's KeyFile, read and written incrementally
//! - `type_emitter`: the generated `Translations` type declaration
//! - `validator`: translation quality checks (placeholders, length)
//! - `metrics`: per-run counters
//!
//! # Example
//!
//! ```rust,ignore
//! use i18n_sync::i18n::{LanguageManifest, ReferenceSet};
//!
//! let manifest = LanguageManifest::load(&root.join("languages.json"), "en")?;
//! let reference = ReferenceSet::load(&root.join(manifest.reference().as_str()))?;
//! let declaration = i18n_sync::i18n::render_declaration("Translations", reference.keys());
//! ```

mod key_file;
mod key_set;
mod language;
mod metrics;
mod type_emitter;
mod validator;

pub use key_file::{is_filled, Entries, KeyFile};
pub use key_set::{KeyCollision, ReferenceFile, ReferenceSet};
pub use language::{Language, LanguageCode, LanguageManifest};
pub use metrics::{MetricsReport, SyncMetrics};
pub use type_emitter::{render_declaration, replace_declaration, update_types_file};
pub use validator::{TranslationValidator, ValidationReport};
