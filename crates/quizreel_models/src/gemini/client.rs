//! Google Gemini API implementation of the question backend.
//!
//! One client per run, bound to a single model. The client performs exactly
//! one API call per `generate_questions` invocation under a configured
//! timeout; retry policy belongs to the question generator, which classifies
//! the returned `BackendError`.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use gemini_rust::{Gemini, client::Model};
use tracing::instrument;

use quizreel_core::{GenerationConfig, Topic};
use quizreel_error::{BackendError, BackendErrorKind, QuizreelResult};
use quizreel_interface::QuestionBackend;

use super::prompt::{SYSTEM_PROMPT, quiz_prompt};

/// Client for the Google Gemini API.
pub struct GeminiQuestionBackend {
    client: Gemini,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiQuestionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiQuestionBackend")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl GeminiQuestionBackend {
    /// Create a backend from the generation configuration.
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the key is missing or the client cannot
    /// be constructed for the configured model.
    #[instrument(name = "gemini_backend_new", skip(config), fields(model = %config.model))]
    pub fn from_config(config: &GenerationConfig) -> QuizreelResult<Self> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            BackendError::new(BackendErrorKind::MissingApiKey("GEMINI_API_KEY".to_string()))
        })?;

        let model_enum = Self::model_name_to_enum(&config.model);
        let client = Gemini::with_model(&api_key, model_enum).map_err(|e| {
            BackendError::new(BackendErrorKind::ClientCreation(e.to_string()))
        })?;

        Ok(Self {
            client,
            model_name: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Known names map to their enum variants; everything else becomes
    /// `Model::Custom` with the `models/` prefix the API requires.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => {
                if other.starts_with("models/") {
                    Model::Custom(other.to_string())
                } else {
                    Model::Custom(format!("models/{}", other))
                }
            }
        }
    }

    /// Parse gemini-rust errors to extract HTTP status codes.
    ///
    /// Converts generic API error strings into a structured `BackendError`
    /// with a status code when one is present, so retry classification can
    /// distinguish 503 from 400.
    fn parse_backend_error(err: impl std::fmt::Display) -> BackendError {
        let err_msg = err.to_string();

        if let Some(status_code) = Self::extract_status_code(&err_msg) {
            BackendError::new(BackendErrorKind::Http {
                status_code,
                message: err_msg,
            })
        } else {
            BackendError::new(BackendErrorKind::Request(err_msg))
        }
    }

    /// Extract an HTTP status code from an error message string.
    ///
    /// Parses strings like "bad response from server; code 503; ..." and
    /// extracts the numeric code.
    fn extract_status_code(error_msg: &str) -> Option<u16> {
        if let Some(code_start) = error_msg.find("code ") {
            let code_str = &error_msg[code_start + 5..];
            let end = code_str
                .find(|c: char| !c.is_numeric())
                .unwrap_or(code_str.len());
            if end > 0 {
                return code_str[..end].parse().ok();
            }
        }
        None
    }
}

#[async_trait]
impl QuestionBackend for GeminiQuestionBackend {
    #[instrument(skip(self, topic), fields(topic = %topic.slug, count))]
    async fn generate_questions(&self, topic: &Topic, count: usize) -> QuizreelResult<String> {
        let prompt = quiz_prompt(topic, count);

        let mut builder = self.client.generate_content();
        builder = builder.with_system_prompt(SYSTEM_PROMPT);
        builder = builder.with_user_message(&prompt);
        builder = builder.with_temperature(self.temperature);
        builder = builder.with_max_output_tokens(self.max_tokens as i32);

        let response = tokio::time::timeout(self.timeout, builder.execute())
            .await
            .map_err(|_| {
                BackendError::new(BackendErrorKind::Timeout(self.timeout.as_secs()))
            })?
            .map_err(Self::parse_backend_error)?;

        Ok(response.text())
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_status_code_from_message() {
        let msg = "bad response from server; code 503; description: overloaded";
        assert_eq!(GeminiQuestionBackend::extract_status_code(msg), Some(503));
    }

    #[test]
    fn no_status_code_in_plain_message() {
        assert_eq!(
            GeminiQuestionBackend::extract_status_code("connection refused"),
            None
        );
    }

    #[test]
    fn status_code_at_end_of_message() {
        assert_eq!(
            GeminiQuestionBackend::extract_status_code("failed with code 429"),
            Some(429)
        );
    }
}
