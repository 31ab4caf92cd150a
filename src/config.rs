use crate::error::SyncError;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    // OpenAI
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_api_url: String,
    pub openai_temperature: f32,

    // Layout
    pub i18n_root: PathBuf,
    pub types_file: PathBuf,
    pub type_name: String,
    pub reference_language: String,

    // Synchronizer
    pub concurrency: usize,
    pub app_context: String,
}

impl Config {
    pub fn from_env() -> Result<Self, SyncError> {
        let concurrency: usize = parse_env("I18N_CONCURRENCY", 4)?;
        if concurrency == 0 {
            return Err(SyncError::config("I18N_CONCURRENCY must be at least 1"));
        }

        Ok(Self {
            // OpenAI
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .map_err(|_| SyncError::config("OPENAI_API_KEY not set"))?,
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            openai_temperature: parse_env("OPENAI_TEMPERATURE", 0.3)?,

            // Layout
            i18n_root: std::env::var("I18N_ROOT")
                .unwrap_or_else(|_| "src/lib/i18n".to_string())
                .into(),
            types_file: std::env::var("I18N_TYPES_FILE")
                .unwrap_or_else(|_| "src/lib/types.ts".to_string())
                .into(),
            type_name: std::env::var("I18N_TYPE_NAME")
                .unwrap_or_else(|_| "Translations".to_string()),
            reference_language: std::env::var("I18N_REFERENCE_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),

            // Synchronizer
            concurrency,
            app_context: std::env::var("I18N_APP_CONTEXT")
                .unwrap_or_else(|_| "a multilingual application".to_string()),
        })
    }

    /// Path of the languages manifest inside the i18n root
    pub fn manifest_path(&self) -> PathBuf {
        self.i18n_root.join("languages.json")
    }
}

/// Read an optional numeric variable; a present but unparsable value is an error
fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, SyncError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SyncError::config(format!("{} has an invalid value: {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "OPENAI_API_KEY",
        "OPENAI_MODEL",
        "OPENAI_API_URL",
        "OPENAI_TEMPERATURE",
        "I18N_ROOT",
        "I18N_TYPES_FILE",
        "I18N_TYPE_NAME",
        "I18N_REFERENCE_LANGUAGE",
        "I18N_CONCURRENCY",
        "I18N_APP_CONTEXT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_model, "gpt-4o");
        assert!((config.openai_temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.i18n_root, PathBuf::from("src/lib/i18n"));
        assert_eq!(config.types_file, PathBuf::from("src/lib/types.ts"));
        assert_eq!(config.type_name, "Translations");
        assert_eq!(config.reference_language, "en");
        assert_eq!(config.concurrency, 4);
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("src/lib/i18n/languages.json")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_api_key() {
        clear_env();

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("OPENAI_MODEL", "gpt-4o-mini");
        std::env::set_var("I18N_ROOT", "/tmp/i18n");
        std::env::set_var("I18N_CONCURRENCY", "8");
        std::env::set_var("I18N_TYPE_NAME", "Messages");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.i18n_root, PathBuf::from("/tmp/i18n"));
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.type_name, "Messages");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_numbers() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");

        std::env::set_var("I18N_CONCURRENCY", "many");
        assert!(Config::from_env().is_err());

        std::env::set_var("I18N_CONCURRENCY", "0");
        assert!(Config::from_env().is_err());

        std::env::set_var("I18N_CONCURRENCY", "2");
        std::env::set_var("OPENAI_TEMPERATURE", "warm");
        assert!(Config::from_env().is_err());

        clear_env();
    }
}
