//! The sequential five-stage run driver.

use crate::cancel::CancelToken;
use crate::generate::QuestionGenerator;
use crate::synthesize::NarrationSynthesizer;
use crate::theme::{SelectionHistory, ThemeSelector};
use quizreel_core::{QuizreelConfig, RenderedArtifact, StorageReceipt};
use quizreel_error::QuizreelResult;
use quizreel_storage::ArtifactStore;
use quizreel_video::{Renderer, VideoAssembler};
use tracing::{info, instrument};

/// Result of a pipeline run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The artifact was rendered and durably stored
    Completed(StorageReceipt),
    /// The run was cancelled between stages; nothing was persisted
    Cancelled,
}

/// One quiz-video pipeline: theme selection, question generation, narration
/// synthesis, video assembly, and artifact storage, strictly in that order,
/// each stage's output gating the next.
///
/// The pipeline owns its stages but not the selection history: history is
/// injected per run so batch callers keep single-writer control over it.
pub struct QuizPipeline<R: Renderer> {
    config: QuizreelConfig,
    generator: QuestionGenerator,
    synthesizer: NarrationSynthesizer,
    assembler: VideoAssembler<R>,
    store: Box<dyn ArtifactStore>,
}

impl<R: Renderer> QuizPipeline<R> {
    /// Wire a pipeline from its parts.
    pub fn new(
        config: QuizreelConfig,
        generator: QuestionGenerator,
        synthesizer: NarrationSynthesizer,
        assembler: VideoAssembler<R>,
        store: Box<dyn ArtifactStore>,
    ) -> Self {
        Self {
            config,
            generator,
            synthesizer,
            assembler,
            store,
        }
    }

    /// Run the full pipeline once.
    ///
    /// The chosen topic is recorded in `history` immediately after
    /// selection; persisting the history file is the caller's
    /// responsibility at the end of its batch.
    ///
    /// # Errors
    ///
    /// The first stage failure aborts the run; the error's kind names the
    /// originating stage. No partial artifact is persisted on any path.
    #[instrument(skip_all)]
    pub async fn run(
        &self,
        history: &mut SelectionHistory,
        cancel: &CancelToken,
    ) -> QuizreelResult<RunOutcome> {
        let Some(artifact) = self.render(history, cancel).await? else {
            return Ok(RunOutcome::Cancelled);
        };

        if cancel.is_cancelled() {
            return Ok(RunOutcome::Cancelled);
        }

        let receipt = self.persist(&artifact).await?;
        Ok(RunOutcome::Completed(receipt))
    }

    /// Stages 1–4: everything up to (but not including) storage.
    ///
    /// Returns `None` when the run is cancelled between stages. Exposed so
    /// a caller holding a rendered artifact can retry storage alone via
    /// [`persist`] without re-running the upstream stages.
    ///
    /// [`persist`]: QuizPipeline::persist
    pub async fn render(
        &self,
        history: &mut SelectionHistory,
        cancel: &CancelToken,
    ) -> QuizreelResult<Option<RenderedArtifact>> {
        let topic = ThemeSelector::select(&self.config.selection, history)?;
        history.record(&topic);
        info!(topic = %topic.slug, "Topic selected");

        if cancel.is_cancelled() {
            return Ok(None);
        }

        let quiz = self.generator.generate(&topic).await?;
        info!(questions = quiz.len(), "Quiz generated");

        if cancel.is_cancelled() {
            return Ok(None);
        }

        let segments = self.synthesizer.synthesize(&quiz, cancel).await?;
        info!(segments = segments.len(), "Narration synthesized");

        if cancel.is_cancelled() {
            return Ok(None);
        }

        let artifact = self.assembler.assemble(&topic, &quiz, &segments).await?;
        info!(
            size = artifact.bytes.len(),
            duration_secs = artifact.duration_secs,
            "Video assembled"
        );

        Ok(Some(artifact))
    }

    /// Stage 5: durably store a rendered artifact.
    ///
    /// Safe to call repeatedly for the same artifact: the storage key is
    /// deterministic and the artifact is never deleted on failure.
    pub async fn persist(&self, artifact: &RenderedArtifact) -> QuizreelResult<StorageReceipt> {
        let receipt = self.store.store(artifact).await?;
        info!(location = %receipt.location, backend = %receipt.backend, "Artifact stored");
        Ok(receipt)
    }

}
