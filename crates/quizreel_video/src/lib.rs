//! Video assembly for Quizreel.
//!
//! This crate turns a quiz spec plus its synthesized narration segments
//! into a single rendered video:
//!
//! 1. **Timeline computation**: segment boundaries derive from measured
//!    audio durations plus configured gaps, never from fixed guesses.
//! 2. **Duration policy**: timelines over the configured maximum lose
//!    trailing segments (audio is never stretched or compressed); timelines
//!    under the minimum are padded by looping background and music.
//! 3. **Overlay mapping**: captions and the correct-answer highlight are a
//!    pure function of the quiz spec and the timeline.
//! 4. **Composition**: an ffmpeg filter graph mixes background, overlays,
//!    narration, countdown ticks, and ducked music into one output stream.
//!
//! Assembly is atomic: rendering happens in a scratch directory and the
//! encoded payload is returned in memory, so no partial file ever exists at
//! a final location.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod assets;
mod compose;
mod renderer;
mod subtitles;
mod timeline;

pub use assembler::VideoAssembler;
pub use assets::ResolvedAssets;
pub use compose::{CompositionPlan, StagedInputs, overlay_card_text};
pub use renderer::{FfmpegRenderer, Renderer};
pub use subtitles::build_srt;
pub use timeline::compute_timeline;
