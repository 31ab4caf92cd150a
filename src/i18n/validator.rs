//! Translation quality validation.
//!
//! UI strings carry interpolation placeholders (`{name}`, `{{count}}`,
//! `%s`, `%1$d`) that must survive translation untouched, and translated
//! labels should stay roughly the size of the original so layouts hold.

use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical errors that indicate translation issues
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation quality.
pub struct TranslationValidator;

static BRACE_PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
static PRINTF_PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Sources shorter than this are too short for a meaningful length check
const MIN_LENGTH_FOR_RATIO: usize = 10;
const MAX_LENGTH_RATIO: f64 = 3.0;
const MIN_LENGTH_RATIO: f64 = 0.25;

impl TranslationValidator {
    /// Validate a translation against its reference text.
    ///
    /// - Missing or invented placeholders are errors
    /// - A length far outside the original's is a warning
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        let mut orig_placeholders = Self::extract_placeholders(original);
        let mut trans_placeholders = Self::extract_placeholders(translated);
        orig_placeholders.sort();
        trans_placeholders.sort();
        if orig_placeholders != trans_placeholders {
            report.errors.push(format!(
                "Placeholder mismatch: original has {:?}, translation has {:?}",
                orig_placeholders, trans_placeholders
            ));
        }

        let orig_len = original.chars().count();
        let trans_len = translated.chars().count();
        if orig_len >= MIN_LENGTH_FOR_RATIO {
            let ratio = trans_len as f64 / orig_len as f64;
            if !(MIN_LENGTH_RATIO..=MAX_LENGTH_RATIO).contains(&ratio) {
                report.warnings.push(format!(
                    "Length mismatch: original has {} chars, translation has {}",
                    orig_len, trans_len
                ));
            }
        }

        report
    }

    /// Extract `{name}`, `{{name}}`, `%s` and `%1$s` style placeholders
    fn extract_placeholders(text: &str) -> Vec<String> {
        let braces = BRACE_PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"\{\{?\s*[A-Za-z0-9_.]+\s*\}?\}").unwrap());
        let printf = PRINTF_PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"%(?:\d+\$)?[sdif@]").unwrap());

        braces
            .find_iter(text)
            .chain(printf.find_iter(text))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
