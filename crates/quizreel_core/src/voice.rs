//! Voice configuration for speech synthesis.

use serde::{Deserialize, Serialize};

/// Voice parameters passed to the speech backend.
///
/// # Examples
///
/// ```
/// use quizreel_core::VoiceConfig;
///
/// let voice = VoiceConfig::default();
/// assert_eq!(voice.language_code, "en-US");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// BCP-47 language code (e.g. "en-US", "fr-FR")
    pub language_code: String,
    /// Provider-specific voice name
    pub name: String,
    /// Speaking rate multiplier (1.0 = normal)
    #[serde(default = "default_rate")]
    pub speaking_rate: f64,
    /// Pitch adjustment in semitones
    #[serde(default)]
    pub pitch: f64,
}

fn default_rate() -> f64 {
    1.0
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language_code: "en-US".to_string(),
            name: "en-US-Neural2-D".to_string(),
            speaking_rate: 1.0,
            pitch: 0.0,
        }
    }
}
