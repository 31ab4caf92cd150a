use crate::error::TranslateError;
use crate::i18n::{Language, SyncMetrics, TranslationValidator};
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use tracing::warn;

/// A service able to translate one UI string into a target language.
///
/// Implementations return the provider's raw answer; judging whether it is
/// a usable translation is left to [`resolve_translation`].
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: &Language) -> Result<String, TranslateError>;
}

/// Openings that mark an apology or refusal instead of a translation.
/// Compared lowercase with straight apostrophes.
const REFUSAL_PREFIXES: &[&str] = &[
    "i'm sorry",
    "i am sorry",
    "sorry",
    "i apologize",
    "i can't",
    "i cannot",
    "as an ai",
];

/// Check if a response opens with a recognized apology or refusal
pub fn is_refusal(response: &str) -> bool {
    let normalized = response
        .trim_start()
        .replace(['\u{2018}', '\u{2019}'], "'")
        .to_lowercase();

    REFUSAL_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}

/// Turn a raw provider answer for `source` into an accepted translation or an error.
///
/// An answer opening like a refusal is accepted when `source` opens the same
/// way, e.g. "Sorry, something went wrong" translated into `en-GB`.
pub fn accept_response(source: &str, response: &str) -> Result<String, TranslateError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(TranslateError::EmptyResponse);
    }
    if is_refusal(trimmed) && !is_refusal(source) {
        return Err(TranslateError::Refusal(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

/// How a missing key got its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The provider produced an accepted translation
    Translated(String),
    /// The reference text was stored instead
    Fallback(String),
}

impl Resolution {
    pub fn into_value(self) -> String {
        match self {
            Resolution::Translated(value) | Resolution::Fallback(value) => value,
        }
    }
}

/// Translate `text`, asking again after a refusal, falling back to `text`.
///
/// Refusals are retried up to `retry.max_attempts`; request errors and empty
/// answers fall back immediately. Never returns an empty value.
pub async fn resolve_translation(
    translator: &dyn Translator,
    retry: &RetryConfig,
    metrics: &SyncMetrics,
    text: &str,
    target: &Language,
) -> Resolution {
    // Nothing to translate
    if text.trim().is_empty() {
        metrics.record_fallback();
        return Resolution::Fallback(text.to_string());
    }

    let operation_name = format!("Translation to {}", target.name());
    let result = with_retry_if(
        retry,
        &operation_name,
        || async move {
            let response = translator.translate(text, target).await?;
            let accepted = accept_response(text, &response);
            if let Err(TranslateError::Refusal(_)) = &accepted {
                metrics.record_refusal();
            }
            accepted
        },
        |e| matches!(e, TranslateError::Refusal(_)),
    )
    .await;

    match result {
        Ok(translated) => {
            let validation = TranslationValidator::validate(text, &translated);
            if validation.has_errors() {
                warn!(
                    "Translation validation errors for {:?} ({}): {:?}",
                    text,
                    target.code(),
                    validation.errors
                );
            }
            if validation.has_warnings() {
                warn!(
                    "Translation validation warnings for {:?} ({}): {:?}",
                    text,
                    target.code(),
                    validation.warnings
                );
            }
            metrics.record_translated();
            Resolution::Translated(translated)
        }
        Err(e) => {
            if !matches!(e, TranslateError::Refusal(_)) {
                metrics.record_request_failure();
            }
            warn!(
                "Error translating {:?} to {}, keeping the original text: {}",
                text,
                target.code(),
                e
            );
            metrics.record_fallback();
            Resolution::Fallback(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LanguageCode;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays scripted answers in order, then repeats the last one
    struct ScriptedTranslator {
        answers: Mutex<Vec<Result<String, TranslateError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedTranslator {
        fn new(answers: Vec<Result<String, TranslateError>>) -> Self {
            Self {
                answers: Mutex::new(answers),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Translator for ScriptedTranslator {
        async fn translate(&self, _text: &str, _target: &Language) -> Result<String, TranslateError> {
            *self.calls.lock().unwrap() += 1;
            let mut answers = self.answers.lock().unwrap();
            if answers.len() > 1 {
                answers.remove(0)
            } else {
                match &answers[0] {
                    Ok(text) => Ok(text.clone()),
                    Err(_) => Err(TranslateError::Request("scripted failure".to_string())),
                }
            }
        }
    }

    fn french() -> Language {
        Language::new(LanguageCode::parse("fr").unwrap(), Some("French".to_string()))
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::new(2, Duration::from_millis(1))
    }

    // ==================== Refusal Detection Tests ====================

    #[test]
    fn test_is_refusal_prefixes() {
        assert!(is_refusal("I'm sorry, I can't help with that"));
        assert!(is_refusal("I\u{2019}m sorry, but no"));
        assert!(is_refusal("  sorry, this text is unclear"));
        assert!(is_refusal("I apologize for the confusion"));
        assert!(is_refusal("As an AI language model, I cannot"));
        assert!(is_refusal("I cannot translate this"));
    }

    #[test]
    fn test_is_refusal_ignores_normal_text() {
        assert!(!is_refusal("Bonjour"));
        assert!(!is_refusal("Désolé"));
        assert!(!is_refusal("Annuler"));
        assert!(!is_refusal(""));
    }

    #[test]
    fn test_accept_response() {
        assert_eq!(accept_response("Hello", "  Bonjour \n").unwrap(), "Bonjour");
        assert!(matches!(
            accept_response("Hello", "   "),
            Err(TranslateError::EmptyResponse)
        ));
        assert!(matches!(
            accept_response("Hello", "Sorry, I can't"),
            Err(TranslateError::Refusal(_))
        ));
    }

    #[test]
    fn test_accept_response_keeps_apologetic_source_text() {
        assert_eq!(
            accept_response("Sorry, something went wrong", "Sorry, something went wrong")
                .unwrap(),
            "Sorry, something went wrong"
        );
        assert_eq!(
            accept_response("I can't find that page", "I can\u{2019}t find that page").unwrap(),
            "I can\u{2019}t find that page"
        );
    }

    // ==================== Resolution Tests ====================

    #[tokio::test]
    async fn test_resolve_accepts_first_answer() {
        let translator = ScriptedTranslator::new(vec![Ok("Bonjour".to_string())]);
        let metrics = SyncMetrics::new();

        let resolution =
            resolve_translation(&translator, &fast_retry(), &metrics, "Hello", &french()).await;

        assert_eq!(resolution, Resolution::Translated("Bonjour".to_string()));
        assert_eq!(translator.calls(), 1);
        assert_eq!(metrics.report().keys_translated, 1);
    }

    #[tokio::test]
    async fn test_resolve_retries_after_refusal() {
        let translator = ScriptedTranslator::new(vec![
            Ok("I'm sorry, I can't help with that".to_string()),
            Ok("Bonjour".to_string()),
        ]);
        let metrics = SyncMetrics::new();

        let resolution =
            resolve_translation(&translator, &fast_retry(), &metrics, "Hello", &french()).await;

        assert_eq!(resolution, Resolution::Translated("Bonjour".to_string()));
        assert_eq!(translator.calls(), 2);
        assert_eq!(metrics.report().refusals, 1);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_after_two_refusals() {
        let translator = ScriptedTranslator::new(vec![Ok("I'm sorry".to_string())]);
        let metrics = SyncMetrics::new();

        let resolution =
            resolve_translation(&translator, &fast_retry(), &metrics, "Hello", &french()).await;

        assert_eq!(resolution, Resolution::Fallback("Hello".to_string()));
        // At most two attempts per key
        assert_eq!(translator.calls(), 2);

        let report = metrics.report();
        assert_eq!(report.refusals, 2);
        assert_eq!(report.fallbacks, 1);
        assert_eq!(report.request_failures, 0);
    }

    #[tokio::test]
    async fn test_resolve_request_error_is_not_retried() {
        let translator = ScriptedTranslator::new(vec![Err(TranslateError::Request(
            "connection reset".to_string(),
        ))]);
        let metrics = SyncMetrics::new();

        let resolution =
            resolve_translation(&translator, &fast_retry(), &metrics, "Hello", &french()).await;

        assert_eq!(resolution, Resolution::Fallback("Hello".to_string()));
        assert_eq!(translator.calls(), 1);
        assert_eq!(metrics.report().request_failures, 1);
    }

    #[tokio::test]
    async fn test_resolve_empty_answer_falls_back() {
        let translator = ScriptedTranslator::new(vec![Ok("   ".to_string())]);
        let metrics = SyncMetrics::new();

        let resolution =
            resolve_translation(&translator, &fast_retry(), &metrics, "Hello", &french()).await;

        assert_eq!(resolution.into_value(), "Hello");
        assert_eq!(translator.calls(), 1);
    }

    #[tokio::test]
    async fn test_resolve_english_variant_of_apology_is_one_call() {
        let translator =
            ScriptedTranslator::new(vec![Ok("Sorry, something went wrong".to_string())]);
        let metrics = SyncMetrics::new();
        let british = Language::new(LanguageCode::parse("en-GB").unwrap(), None);

        let resolution = resolve_translation(
            &translator,
            &fast_retry(),
            &metrics,
            "Sorry, something went wrong",
            &british,
        )
        .await;

        assert_eq!(
            resolution,
            Resolution::Translated("Sorry, something went wrong".to_string())
        );
        assert_eq!(translator.calls(), 1);
        assert_eq!(metrics.report().refusals, 0);
    }

    #[tokio::test]
    async fn test_resolve_skips_blank_source() {
        let translator = ScriptedTranslator::new(vec![Ok("Bonjour".to_string())]);
        let metrics = SyncMetrics::new();

        let resolution =
            resolve_translation(&translator, &fast_retry(), &metrics, " ", &french()).await;

        assert_eq!(resolution, Resolution::Fallback(" ".to_string()));
        assert_eq!(translator.calls(), 0);
    }
}
