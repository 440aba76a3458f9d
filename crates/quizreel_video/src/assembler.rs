//! The video assembler: timeline, staging, and atomic render.

use crate::assets::ResolvedAssets;
use crate::compose::{CompositionPlan, StagedInputs, overlay_card_text};
use crate::renderer::{FfmpegRenderer, Renderer};
use crate::subtitles::build_srt;
use crate::timeline::compute_timeline;
use chrono::Utc;
use quizreel_core::{
    AssetConfig, NarrationSegment, QuizSpec, QuizreelConfig, RenderConfig, RenderedArtifact,
    SegmentRole, SubtitleConfig, Timeline, TimingConfig, Topic, VideoConfig,
};
use quizreel_error::{QuizreelResult, RenderError, RenderErrorKind, RetryableError};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Merges background visuals, narration, caption overlays, and music into
/// one rendered video whose schedule is derived from measured audio
/// durations.
///
/// Assembly is atomic: all staging and encoding happens inside a scratch
/// directory that is dropped afterwards, and the encoded payload is
/// returned in memory. On any failure no output file exists anywhere a
/// caller would look.
pub struct VideoAssembler<R: Renderer> {
    renderer: R,
    video: VideoConfig,
    timing: TimingConfig,
    assets: AssetConfig,
    subtitles: SubtitleConfig,
    render: RenderConfig,
}

impl VideoAssembler<FfmpegRenderer> {
    /// Build an assembler with the ffmpeg renderer discovered on PATH.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` when ffmpeg cannot be located.
    pub fn from_config(config: &QuizreelConfig) -> QuizreelResult<Self> {
        let renderer = FfmpegRenderer::discover(&config.render)?;
        Ok(Self::with_renderer(config, renderer))
    }
}

impl<R: Renderer> VideoAssembler<R> {
    /// Build an assembler around an explicit renderer.
    pub fn with_renderer(config: &QuizreelConfig, renderer: R) -> Self {
        Self {
            renderer,
            video: config.video.clone(),
            timing: config.timing.clone(),
            assets: config.assets.clone(),
            subtitles: config.subtitles.clone(),
            render: config.render.clone(),
        }
    }

    /// Assemble one rendered video from a quiz and its narration segments.
    ///
    /// # Errors
    ///
    /// `AssetError` when a required background/music/tick file is missing;
    /// `RenderError` when the timeline cannot satisfy the duration policy
    /// or the encoder fails after its retry budget.
    #[instrument(skip(self, quiz, segments), fields(topic = %topic.slug, segments = segments.len()))]
    pub async fn assemble(
        &self,
        topic: &Topic,
        quiz: &QuizSpec,
        segments: &[NarrationSegment],
    ) -> QuizreelResult<RenderedArtifact> {
        let timeline = compute_timeline(quiz, segments, &self.timing, &self.video)?;

        let needs_countdown = self.timing.countdown_secs > 0.0
            && timeline.entries.iter().skip(1).any(|e| {
                segments
                    .get(e.segment_index)
                    .is_some_and(|s| s.role == SegmentRole::AnswerReveal)
            });
        let assets = ResolvedAssets::resolve(topic, &self.assets, needs_countdown)?;

        let scratch = tempfile::tempdir().map_err(|e| {
            RenderError::new(RenderErrorKind::Staging(format!("scratch dir: {}", e)))
        })?;

        let staged = self.stage_inputs(scratch.path(), &timeline, segments)?;
        let plan = CompositionPlan::build(
            &timeline,
            &staged,
            &assets,
            &self.video,
            &self.timing,
            self.render.music_volume,
            scratch.path().join("out.mp4"),
        )?;

        let bytes = self.render_with_retry(&plan).await?;
        let checksum = format!("{:x}", Sha256::digest(&bytes));

        info!(
            size = bytes.len(),
            duration_secs = plan.output_duration_secs(),
            truncated = timeline.truncated,
            "Assembled video"
        );

        Ok(RenderedArtifact {
            bytes,
            duration_secs: plan.output_duration_secs(),
            width: self.video.width,
            height: self.video.height,
            fps: self.video.fps,
            checksum,
            topic_slug: topic.slug.clone(),
            created_at: Utc::now(),
        })
    }

    /// Write narration clips, overlay cards, and the subtitle track into
    /// the scratch directory.
    fn stage_inputs(
        &self,
        scratch: &std::path::Path,
        timeline: &Timeline,
        segments: &[NarrationSegment],
    ) -> QuizreelResult<StagedInputs> {
        let stage_err = |what: &str, e: std::io::Error| {
            RenderError::new(RenderErrorKind::Staging(format!("{}: {}", what, e)))
        };

        let mut narration_wavs = Vec::with_capacity(timeline.entries.len());
        let mut overlay_texts = Vec::with_capacity(timeline.entries.len());

        for (i, entry) in timeline.entries.iter().enumerate() {
            let segment = segments.get(entry.segment_index).ok_or_else(|| {
                RenderError::new(RenderErrorKind::Staging(format!(
                    "timeline references missing segment {}",
                    entry.segment_index
                )))
            })?;

            let wav: PathBuf = scratch.join(format!("seg_{}.wav", i));
            std::fs::write(&wav, &segment.audio).map_err(|e| stage_err("narration clip", e))?;
            narration_wavs.push(wav);

            let card = scratch.join(format!("card_{}.txt", i));
            std::fs::write(&card, overlay_card_text(&entry.overlay))
                .map_err(|e| stage_err("overlay card", e))?;
            overlay_texts.push(card);
        }

        let subtitles = if self.subtitles.enabled {
            let srt = scratch.join("subs.srt");
            std::fs::write(&srt, build_srt(timeline, segments, self.subtitles.word_by_word))
                .map_err(|e| stage_err("subtitle track", e))?;
            Some(srt)
        } else {
            None
        };

        Ok(StagedInputs {
            narration_wavs,
            overlay_texts,
            subtitles,
        })
    }

    /// Run the encoder, retrying transient failures up to the configured
    /// budget with a short linear backoff.
    async fn render_with_retry(&self, plan: &CompositionPlan) -> QuizreelResult<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match self.renderer.render(plan).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    let retryable = match e.kind() {
                        quizreel_error::QuizreelErrorKind::Render(r) => r.is_retryable(),
                        _ => false,
                    };
                    if !retryable || attempt >= self.render.max_retries {
                        return Err(e);
                    }
                    attempt += 1;
                    let backoff = std::time::Duration::from_millis(500 * attempt as u64);
                    warn!(attempt, error = %e, "Encoder failed, retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}
