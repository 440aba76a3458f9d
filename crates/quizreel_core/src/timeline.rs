//! Timeline types: the audio-duration-driven schedule of a video.

use serde::{Deserialize, Serialize};

/// The visual overlay shown while a timeline entry plays.
///
/// Overlay content is a pure function of the quiz spec and the entry's
/// position; nothing here is random.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OverlaySpec {
    /// Question prompt with all choices listed, none highlighted
    QuestionCard {
        /// Question prompt text
        prompt: String,
        /// Choice texts in order
        choices: Vec<String>,
    },
    /// Question prompt with all choices listed and the correct one highlighted
    AnswerCard {
        /// Question prompt text
        prompt: String,
        /// Choice texts in order
        choices: Vec<String>,
        /// Index of the highlighted (correct) choice
        correct_index: usize,
    },
}

/// One scheduled narration segment with its computed boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Index into the run's ordered segment list
    pub segment_index: usize,
    /// Start offset from the beginning of the video, in seconds
    pub start_secs: f64,
    /// End offset from the beginning of the video, in seconds
    pub end_secs: f64,
    /// Overlay to display for this entry's interval
    pub overlay: OverlaySpec,
}

impl TimelineEntry {
    /// Duration of this entry in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// The computed schedule for one video: ordered, contiguous entries whose
/// boundaries are derived from measured narration durations plus configured
/// gaps.
///
/// `total_secs` covers the trailing gap after the final entry as well, so it
/// equals the duration of the rendered video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Scheduled entries in playback order
    pub entries: Vec<TimelineEntry>,
    /// Total video duration in seconds
    pub total_secs: f64,
    /// Number of trailing segments dropped to satisfy the maximum duration
    pub truncated: usize,
}

impl Timeline {
    /// Start/end pairs for every entry, in order.
    pub fn spans(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries.iter().map(|e| (e.start_secs, e.end_secs))
    }
}
