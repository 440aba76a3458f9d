//! Narration segment types.

use serde::{Deserialize, Serialize};

/// The role a spoken unit plays within its question.
///
/// Timeline construction keys off this: the countdown gap is inserted
/// before an `AnswerReveal`, and truncation treats reveals as the lowest
/// priority trailing content.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum SegmentRole {
    /// The question prompt (with choices read aloud when configured)
    Question,
    /// A single choice read aloud as its own segment
    Choice,
    /// The answer reveal
    AnswerReveal,
}

/// One atomic spoken unit with its synthesized audio and measured duration.
///
/// Produced 1:1 with the spoken units derived from a [`QuizSpec`], in the
/// same order. Ownership transfers to the video assembler, which stages the
/// audio bytes for composition.
///
/// [`QuizSpec`]: crate::QuizSpec
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationSegment {
    /// Index of the question unit this segment belongs to
    pub unit_index: usize,
    /// The text that was spoken
    pub text: String,
    /// Synthesized audio (WAV bytes)
    pub audio: Vec<u8>,
    /// Measured duration in seconds, as reported by the speech backend
    pub duration_secs: f64,
    /// The role of this segment within its question
    pub role: SegmentRole,
}
