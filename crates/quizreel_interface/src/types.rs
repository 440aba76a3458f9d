//! Shared types for backend contracts.

/// Synthesized speech for one text unit.
///
/// The duration must be truthful; timeline construction depends on it.
/// Backends that decode their own container format are responsible for
/// measuring the real audio length, not estimating it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpokenAudio {
    /// Audio payload (WAV bytes)
    pub audio: Vec<u8>,
    /// Measured duration in seconds
    pub duration_secs: f64,
}
