//! Backend provider implementations for Quizreel.
//!
//! Concrete providers behind the `quizreel_interface` capability traits:
//!
//! - [`GeminiQuestionBackend`]: question generation via the Google Gemini
//!   API (`gemini-rust`)
//! - [`GoogleSpeechBackend`]: narration synthesis via the Google Cloud
//!   Text-to-Speech REST API
//!
//! Providers are selected by configuration at construction time through
//! [`question_backend_from_config`] and [`speech_backend_from_config`];
//! call sites never branch on the provider.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod google_tts;

pub use gemini::GeminiQuestionBackend;
pub use google_tts::GoogleSpeechBackend;

use quizreel_core::{GenerationConfig, TtsConfig};
use quizreel_error::{ConfigError, QuizreelResult};
use quizreel_interface::{QuestionBackend, SpeechBackend};

/// Construct the configured question-generation backend.
///
/// # Errors
///
/// Returns `ConfigError` for an unknown provider name, or a backend error
/// if the provider cannot be constructed (e.g. missing API key).
pub fn question_backend_from_config(
    config: &GenerationConfig,
) -> QuizreelResult<Box<dyn QuestionBackend>> {
    match config.provider.as_str() {
        "gemini" => Ok(Box::new(GeminiQuestionBackend::from_config(config)?)),
        other => Err(ConfigError::new(format!(
            "Unknown generation provider '{}' (expected \"gemini\")",
            other
        ))
        .into()),
    }
}

/// Construct the configured speech-synthesis backend.
///
/// # Errors
///
/// Returns `ConfigError` for an unknown provider name, or a backend error
/// if the provider cannot be constructed.
pub fn speech_backend_from_config(config: &TtsConfig) -> QuizreelResult<Box<dyn SpeechBackend>> {
    match config.provider.as_str() {
        "google" => Ok(Box::new(GoogleSpeechBackend::from_config(config)?)),
        other => Err(ConfigError::new(format!(
            "Unknown tts provider '{}' (expected \"google\")",
            other
        ))
        .into()),
    }
}
