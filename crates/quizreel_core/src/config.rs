//! Layered TOML configuration for the pipeline.
//!
//! Configuration sources in order of precedence (later overrides earlier):
//! 1. Bundled defaults (`quizreel.toml` shipped with the crate)
//! 2. User config in home directory (`~/.config/quizreel/quizreel.toml`)
//! 3. User config in current directory (`./quizreel.toml`)

use crate::VoiceConfig;
use config::{Config, File, FileFormat};
use quizreel_error::{ConfigError, QuizreelResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Output video geometry and duration bounds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VideoConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Output frame rate
    pub fps: u32,
    /// Hard upper bound on video duration; excess narration is truncated
    pub max_duration_secs: f64,
    /// Lower bound; shorter timelines loop background and music to reach it
    pub min_duration_secs: f64,
}

/// Theme list and repeat-avoidance policy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SelectionConfig {
    /// Configured topic labels (must be non-empty)
    pub themes: Vec<String>,
    /// Optional per-theme selection weights (default weight is 1.0)
    #[serde(default)]
    pub weights: HashMap<String, f64>,
    /// How many recently used topics to exclude from selection
    #[serde(default = "default_exclude_recent")]
    pub exclude_recent: usize,
    /// Where selection history is persisted between runs
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
}

fn default_exclude_recent() -> usize {
    3
}

fn default_history_path() -> PathBuf {
    PathBuf::from("quizreel_history.json")
}

/// Question generation backend settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Provider selector (currently "gemini")
    pub provider: String,
    /// Model identifier passed to the provider
    pub model: String,
    /// Questions requested per video
    pub questions_per_video: usize,
    /// Retry budget for transient backend failures
    #[serde(default = "default_generation_retries")]
    pub max_retries: usize,
    /// Initial retry backoff in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Output token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_generation_retries() -> usize {
    2
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

/// Speech synthesis backend settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TtsConfig {
    /// Provider selector (currently "google")
    pub provider: String,
    /// Voice parameters forwarded to the backend
    pub voice: VoiceConfig,
    /// Read each choice aloud as part of the question segment
    #[serde(default = "default_true")]
    pub read_choices_aloud: bool,
    /// Upper bound on concurrent synthesis calls
    #[serde(default = "default_tts_concurrency")]
    pub max_concurrency: usize,
    /// Per-segment retry budget for transient failures
    #[serde(default = "default_generation_retries")]
    pub max_retries: usize,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_tts_concurrency() -> usize {
    4
}

/// Gap timing between narration segments.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Silence between consecutive segments, in seconds
    pub segment_pause_secs: f64,
    /// Countdown gap before an answer reveal, in seconds; 0 disables the
    /// countdown and falls back to the ordinary pause
    #[serde(default = "default_countdown")]
    pub countdown_secs: f64,
}

fn default_countdown() -> f64 {
    3.0
}

/// Locations of required media assets.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AssetConfig {
    /// Directory holding per-theme background videos (`{slug}.mp4`)
    pub backgrounds_dir: PathBuf,
    /// Background used when no per-theme video exists
    pub default_background: PathBuf,
    /// Music bed, looped under the whole video
    pub music: PathBuf,
    /// Tick sound played during the countdown gap
    pub countdown_tick: PathBuf,
}

/// Subtitle emission settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubtitleConfig {
    /// Emit an SRT track alongside the burned-in overlays
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Split each segment into per-word subtitles with uniform timing
    #[serde(default)]
    pub word_by_word: bool,
}

/// Which storage backend persists the rendered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local filesystem with atomic rename
    Local,
    /// HTTP object storage with acknowledged writes
    Remote,
}

/// Remote object storage settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RemoteStorageConfig {
    /// Base endpoint, e.g. `https://storage.example.com`
    pub endpoint: String,
    /// Bucket or container name
    pub bucket: String,
    /// Environment variable holding the bearer token, if the endpoint
    /// requires authentication
    #[serde(default)]
    pub auth_token_env: Option<String>,
    /// Per-upload timeout in seconds
    #[serde(default = "default_upload_timeout")]
    pub timeout_secs: u64,
}

fn default_upload_timeout() -> u64 {
    120
}

/// Artifact storage settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Backend selector
    pub backend: StorageBackend,
    /// Destination directory for the local backend
    pub local_path: PathBuf,
    /// Remote backend settings; required when `backend = "remote"`
    #[serde(default)]
    pub remote: Option<RemoteStorageConfig>,
}

/// Render toolchain settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Retry budget for transient toolchain failures
    #[serde(default = "default_render_retries")]
    pub max_retries: usize,
    /// Encoder timeout in seconds
    #[serde(default = "default_render_timeout")]
    pub timeout_secs: u64,
    /// Music volume relative to narration (0.0..=1.0)
    #[serde(default = "default_music_volume")]
    pub music_volume: f64,
}

fn default_render_retries() -> usize {
    2
}

fn default_render_timeout() -> u64 {
    300
}

fn default_music_volume() -> f64 {
    0.1
}

/// Top-level Quizreel configuration.
///
/// # Example
///
/// ```no_run
/// use quizreel_core::QuizreelConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = QuizreelConfig::load()?;
/// println!("{} themes configured", config.selection.themes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QuizreelConfig {
    /// Output video geometry and duration bounds
    pub video: VideoConfig,
    /// Theme list and repeat-avoidance policy
    pub selection: SelectionConfig,
    /// Question generation backend settings
    pub generation: GenerationConfig,
    /// Speech synthesis backend settings
    pub tts: TtsConfig,
    /// Gap timing between segments
    pub timing: TimingConfig,
    /// Required media asset locations
    pub assets: AssetConfig,
    /// Subtitle emission settings
    pub subtitles: SubtitleConfig,
    /// Artifact storage settings
    pub storage: StorageConfig,
    /// Render toolchain settings
    pub render: RenderConfig,
}

impl QuizreelConfig {
    /// Load configuration from a specific file path, on top of the bundled
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// merged configuration fails validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> QuizreelResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: current dir > home dir > bundled
    /// defaults. User config files are optional and silently skipped when
    /// absent.
    #[instrument]
    pub fn load() -> QuizreelResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/quizreel/quizreel.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::from(PathBuf::from("quizreel.toml")).required(false));

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the pipeline depends on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty theme list, degenerate video
    /// geometry, inverted duration bounds, or a remote storage selection
    /// without remote settings.
    pub fn validate(&self) -> QuizreelResult<()> {
        if self.selection.themes.is_empty() {
            return Err(ConfigError::new("selection.themes must not be empty").into());
        }
        if self.video.width == 0 || self.video.height == 0 || self.video.fps == 0 {
            return Err(ConfigError::new("video width, height, and fps must be non-zero").into());
        }
        if self.video.min_duration_secs > self.video.max_duration_secs {
            return Err(ConfigError::new(format!(
                "video.min_duration_secs ({}) exceeds video.max_duration_secs ({})",
                self.video.min_duration_secs, self.video.max_duration_secs
            ))
            .into());
        }
        if self.generation.questions_per_video == 0 {
            return Err(ConfigError::new("generation.questions_per_video must be at least 1").into());
        }
        if self.tts.max_concurrency == 0 {
            return Err(ConfigError::new("tts.max_concurrency must be at least 1").into());
        }
        if self.timing.segment_pause_secs < 0.0 || self.timing.countdown_secs < 0.0 {
            return Err(ConfigError::new("timing gaps must not be negative").into());
        }
        if !(0.0..=1.0).contains(&self.render.music_volume) {
            return Err(ConfigError::new("render.music_volume must be within 0.0..=1.0").into());
        }
        if self.storage.backend == StorageBackend::Remote && self.storage.remote.is_none() {
            return Err(
                ConfigError::new("storage.backend = \"remote\" requires a [storage.remote] section")
                    .into(),
            );
        }
        Ok(())
    }
}

// Bundled default configuration
const DEFAULT_CONFIG: &str = include_str!("../quizreel.toml");
