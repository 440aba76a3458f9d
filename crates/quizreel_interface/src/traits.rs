//! Capability traits for pluggable backends.

use crate::SpokenAudio;
use async_trait::async_trait;
use quizreel_core::{Topic, VoiceConfig};
use quizreel_error::QuizreelResult;

/// Contract for content-generation backends.
///
/// Implementations perform one network call and surface transport failures
/// as `BackendError`; they do not validate or normalize the returned text.
/// Parsing the raw response into a quiz, and deciding whether it is
/// malformed, is the question generator's job.
#[async_trait]
pub trait QuestionBackend: Send + Sync {
    /// Request `count` multiple-choice questions about `topic`, returning
    /// the backend's raw text response.
    async fn generate_questions(&self, topic: &Topic, count: usize) -> QuizreelResult<String>;

    /// Provider name (e.g. "gemini").
    fn provider_name(&self) -> &'static str;
}

/// Contract for speech-synthesis backends.
///
/// Implementations must report the measured duration of the returned audio;
/// segment scheduling is derived from these values, so a wrong duration
/// desynchronizes captions from narration.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Synthesize `text` with the given voice, returning audio bytes and
    /// the measured duration.
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> QuizreelResult<SpokenAudio>;

    /// Provider name (e.g. "google").
    fn provider_name(&self) -> &'static str;
}
