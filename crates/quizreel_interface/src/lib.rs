//! Trait definitions for the external backends a pipeline run depends on.
//!
//! Each collaborator (question generation, speech synthesis) is modeled
//! as a narrow capability trait. Concrete providers live in
//! `quizreel_models`; the pipeline only ever sees these contracts, so
//! backends are selected by configuration at construction time rather than
//! branched on at call sites.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{QuestionBackend, SpeechBackend};
pub use types::SpokenAudio;
