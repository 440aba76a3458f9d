//! Required-asset resolution.
//!
//! Backgrounds are looked up per theme with a configured default as
//! fallback. Missing assets are fatal: they need an operator to place a
//! file, not a retry.

use quizreel_core::{AssetConfig, Topic};
use quizreel_error::{AssetError, AssetErrorKind, QuizreelResult};
use std::path::PathBuf;

/// The concrete asset files one composition will read.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssets {
    /// Background video for the run's theme
    pub background: PathBuf,
    /// Music bed
    pub music: PathBuf,
    /// Countdown tick sound, when a countdown gap is configured
    pub countdown_tick: Option<PathBuf>,
}

impl ResolvedAssets {
    /// Resolve assets for a topic.
    ///
    /// The background is `{backgrounds_dir}/{slug}.mp4` when present,
    /// otherwise the configured default. The tick sound is only required
    /// when `needs_countdown` is set.
    ///
    /// # Errors
    ///
    /// Returns `AssetError` naming the first missing required file.
    #[tracing::instrument(skip(config), fields(topic = %topic.slug))]
    pub fn resolve(
        topic: &Topic,
        config: &AssetConfig,
        needs_countdown: bool,
    ) -> QuizreelResult<Self> {
        let themed = config.backgrounds_dir.join(format!("{}.mp4", topic.slug));
        let background = if themed.is_file() {
            themed
        } else if config.default_background.is_file() {
            tracing::debug!(
                themed = %themed.display(),
                "No themed background, using default"
            );
            config.default_background.clone()
        } else {
            return Err(AssetError::new(AssetErrorKind::MissingBackground(format!(
                "{} (and no default at {})",
                themed.display(),
                config.default_background.display()
            )))
            .into());
        };

        if !config.music.is_file() {
            return Err(AssetError::new(AssetErrorKind::MissingMusic(
                config.music.display().to_string(),
            ))
            .into());
        }

        let countdown_tick = if needs_countdown {
            if !config.countdown_tick.is_file() {
                return Err(AssetError::new(AssetErrorKind::MissingTick(
                    config.countdown_tick.display().to_string(),
                ))
                .into());
            }
            Some(config.countdown_tick.clone())
        } else {
            None
        };

        Ok(Self {
            background,
            music: config.music.clone(),
            countdown_tick,
        })
    }
}
