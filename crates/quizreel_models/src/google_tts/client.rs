//! Google Cloud Text-to-Speech REST client.
//!
//! Requests LINEAR16 output so the returned payload is a WAV container and
//! the duration can be measured from the container header rather than
//! estimated.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{debug, instrument};

use quizreel_core::{TtsConfig, VoiceConfig};
use quizreel_error::{BackendError, BackendErrorKind, QuizreelResult};
use quizreel_interface::{SpeechBackend, SpokenAudio};

use super::dto::{
    AudioConfig, SynthesisInput, SynthesizeRequest, SynthesizeResponse, VoiceSelection,
};
use super::wav::wav_duration_secs;

const ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Sample rate requested from the API. 24kHz keeps payloads small while
/// staying above what the encoder resamples to.
const SAMPLE_RATE_HZ: u32 = 24000;

/// Client for the Cloud Text-to-Speech REST API.
pub struct GoogleSpeechBackend {
    http: reqwest::Client,
    api_key: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for GoogleSpeechBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSpeechBackend").finish_non_exhaustive()
    }
}

impl GoogleSpeechBackend {
    /// Create a backend from the tts configuration.
    ///
    /// Reads the API key from the `GOOGLE_TTS_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the key is missing or the HTTP client
    /// cannot be constructed.
    #[instrument(name = "google_tts_new", skip(config))]
    pub fn from_config(config: &TtsConfig) -> QuizreelResult<Self> {
        let api_key = env::var("GOOGLE_TTS_API_KEY").map_err(|_| {
            BackendError::new(BackendErrorKind::MissingApiKey(
                "GOOGLE_TTS_API_KEY".to_string(),
            ))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::new(BackendErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            http,
            api_key,
            timeout_secs: config.timeout_secs,
        })
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::new(BackendErrorKind::Timeout(self.timeout_secs))
        } else {
            BackendError::new(BackendErrorKind::Request(e.to_string()))
        }
    }
}

#[async_trait]
impl SpeechBackend for GoogleSpeechBackend {
    #[instrument(skip(self, text, voice), fields(chars = text.len(), voice = %voice.name))]
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> QuizreelResult<SpokenAudio> {
        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &voice.language_code,
                name: &voice.name,
            },
            audio_config: AudioConfig {
                audio_encoding: "LINEAR16",
                speaking_rate: voice.speaking_rate,
                pitch: voice.pitch,
                sample_rate_hertz: SAMPLE_RATE_HZ,
            },
        };

        let response = self
            .http
            .post(ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let tail: String = body.chars().take(200).collect();
            return Err(BackendError::new(BackendErrorKind::Http {
                status_code: status.as_u16(),
                message: tail,
            })
            .into());
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| BackendError::new(BackendErrorKind::Decode(e.to_string())))?;

        let audio = BASE64.decode(payload.audio_content.as_bytes()).map_err(|e| {
            BackendError::new(BackendErrorKind::Decode(format!("base64: {}", e)))
        })?;

        let duration_secs = wav_duration_secs(&audio).ok_or_else(|| {
            BackendError::new(BackendErrorKind::Decode(
                "response audio is not a measurable WAV container".to_string(),
            ))
        })?;

        debug!(bytes = audio.len(), duration_secs, "Synthesized speech");

        Ok(SpokenAudio {
            audio,
            duration_secs,
        })
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}
