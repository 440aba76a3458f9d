//! Pipeline orchestration for Quizreel.
//!
//! One run flows through five sequential stages (theme selection, question
//! generation, narration synthesis, video assembly, artifact storage) with
//! each stage's output gating the next. Only narration synthesis is
//! internally concurrent; its results are reassembled in input order before
//! the stage returns.
//!
//! Failure at any stage aborts the run with a typed error carrying the
//! originating stage; no partial artifact is ever persisted.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod generate;
mod runner;
mod synthesize;
mod theme;

pub use cancel::CancelToken;
pub use generate::{QuestionGenerator, extract_json};
pub use runner::{QuizPipeline, RunOutcome};
pub use synthesize::NarrationSynthesizer;
pub use theme::{SelectionHistory, ThemeSelector};
