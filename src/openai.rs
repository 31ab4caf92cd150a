use crate::config::Config;
use crate::error::TranslateError;
use crate::i18n::Language;
use crate::translation::Translator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OpenAI Chat Completion request for translation
#[derive(Debug, Serialize)]
struct TranslationRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<String>,
}

/// Check if a model is a reasoning model that doesn't support temperature
fn is_reasoning_model(model: &str) -> bool {
    model.starts_with("gpt-5")
        || model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("o4")
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Build the system prompt for translating interface strings
fn build_translation_system_prompt(app_context: &str) -> String {
    format!(
        r#"You translate user interface strings for {}.

## Rules
- Reply with ONLY the translation. No explanations, notes, quotes or alternatives.
- Your reply is inserted into the app automatically; anything besides the translation breaks the app.
- Keep the translation approximately the same length as the original so the UI layout holds.
- Keep placeholders such as {{name}}, {{{{count}}}}, %s and %1$d exactly as they are.
- Keep product names, brand names and URLs untranslated."#,
        app_context
    )
}

/// Build the user prompt for a single string
fn build_translation_user_prompt(text: &str, target_language: &str) -> String {
    format!("Translate the following into {}: {}", target_language, text)
}

/// Translator backed by an OpenAI-compatible chat completions endpoint
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    app_context: String,
}

impl OpenAiTranslator {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            temperature: config.openai_temperature,
            app_context: config.app_context.clone(),
        }
    }

    fn build_request(&self, text: &str, target_language: &str) -> TranslationRequest {
        // Reasoning models don't support temperature - use reasoning_effort instead
        let is_reasoning = is_reasoning_model(&self.model);

        TranslationRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: build_translation_system_prompt(&self.app_context),
                },
                Message {
                    role: "user".to_string(),
                    content: build_translation_user_prompt(text, target_language),
                },
            ],
            temperature: if is_reasoning {
                None
            } else {
                Some(self.temperature)
            },
            reasoning_effort: if is_reasoning {
                Some("low".to_string())
            } else {
                None
            },
        }
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str, target: &Language) -> Result<String, TranslateError> {
        let request = self.build_request(text, target.name());

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(TranslateError::Api { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(TranslateError::EmptyResponse)
    }
}
