//! Wire types for the Cloud Text-to-Speech REST API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct SynthesizeRequest<'a> {
    pub input: SynthesisInput<'a>,
    pub voice: VoiceSelection<'a>,
    #[serde(rename = "audioConfig")]
    pub audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct SynthesisInput<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoiceSelection<'a> {
    pub language_code: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AudioConfig {
    pub audio_encoding: &'static str,
    pub speaking_rate: f64,
    pub pitch: f64,
    pub sample_rate_hertz: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SynthesizeResponse {
    #[serde(rename = "audioContent")]
    pub audio_content: String,
}
