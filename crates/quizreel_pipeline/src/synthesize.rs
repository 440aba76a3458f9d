//! Narration synthesis: concurrent per-segment calls, ordered reassembly.

use crate::cancel::CancelToken;
use crate::generate::classify_for_retry;
use quizreel_core::{NarrationSegment, QuizSpec, SegmentRole, TtsConfig, VoiceConfig};
use quizreel_error::{
    GenerationError, QuizreelResult, SynthesisError, SynthesisErrorKind,
};
use quizreel_interface::SpeechBackend;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_retry2::{Retry, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, instrument};

/// One spoken unit derived from the quiz, before synthesis.
#[derive(Debug, Clone, PartialEq)]
struct SpokenUnit {
    unit_index: usize,
    role: SegmentRole,
    text: String,
}

/// Derive the ordered spoken units for a quiz.
///
/// Per question: the prompt, each choice as its own unit when configured,
/// and the answer reveal. The order here is the order the timeline will
/// schedule, so it is load-bearing, not cosmetic.
fn spoken_units(quiz: &QuizSpec, read_choices_aloud: bool) -> Vec<SpokenUnit> {
    let mut units = Vec::new();
    for (unit_index, question) in quiz.units.iter().enumerate() {
        units.push(SpokenUnit {
            unit_index,
            role: SegmentRole::Question,
            text: question.prompt.clone(),
        });
        if read_choices_aloud {
            for (i, choice) in question.choices.iter().enumerate() {
                units.push(SpokenUnit {
                    unit_index,
                    role: SegmentRole::Choice,
                    text: format!("Choice {}: {}", i + 1, choice),
                });
            }
        }
        let answer = question.correct_choice().unwrap_or_default();
        units.push(SpokenUnit {
            unit_index,
            role: SegmentRole::AnswerReveal,
            text: format!("The answer is: {}", answer),
        });
    }
    units
}

/// Synthesizes narration for every spoken unit of a quiz.
///
/// Segment calls run concurrently up to the configured bound, each tagged
/// with its position and collected into a pre-sized slot vector, so the
/// returned segments are in input order regardless of completion order.
/// Any segment that fails past its retry budget fails the whole stage;
/// partial narration cannot produce a correct timeline.
pub struct NarrationSynthesizer {
    backend: Arc<dyn SpeechBackend>,
    config: TtsConfig,
}

impl NarrationSynthesizer {
    /// Create a synthesizer around a speech backend.
    pub fn new(backend: Arc<dyn SpeechBackend>, config: TtsConfig) -> Self {
        Self { backend, config }
    }

    /// Synthesize all segments for a quiz, preserving unit order.
    ///
    /// # Errors
    ///
    /// `GenerationError` when a spoken unit has empty text (upstream
    /// validation failure); `SynthesisError` when a segment irrecoverably
    /// fails, a worker aborts, or the run is cancelled mid-stage.
    #[instrument(skip(self, quiz, cancel), fields(questions = quiz.len()))]
    pub async fn synthesize(
        &self,
        quiz: &QuizSpec,
        cancel: &CancelToken,
    ) -> QuizreelResult<Vec<NarrationSegment>> {
        let units = spoken_units(quiz, self.config.read_choices_aloud);

        for (index, unit) in units.iter().enumerate() {
            if unit.text.trim().is_empty() {
                return Err(GenerationError::new(format!(
                    "spoken unit {} has empty text",
                    index
                ))
                .into());
            }
        }

        let total = units.len();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut join_set: JoinSet<QuizreelResult<(usize, NarrationSegment)>> = JoinSet::new();

        for (index, unit) in units.into_iter().enumerate() {
            let backend = Arc::clone(&self.backend);
            let voice = self.config.voice.clone();
            let semaphore = Arc::clone(&semaphore);
            let max_retries = self.config.max_retries;

            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("synthesis semaphore closed");
                synthesize_one(backend.as_ref(), &voice, index, unit, max_retries).await
            });
        }

        // Barrier-join into indexed slots; completion order is irrelevant
        let mut slots: Vec<Option<NarrationSegment>> = (0..total).map(|_| None).collect();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    join_set.abort_all();
                    return Err(SynthesisError::new(SynthesisErrorKind::Cancelled).into());
                }
                joined = join_set.join_next() => {
                    match joined {
                        None => break,
                        Some(Ok(Ok((index, segment)))) => {
                            debug!(index, duration_secs = segment.duration_secs, "Segment ready");
                            slots[index] = Some(segment);
                        }
                        Some(Ok(Err(e))) => {
                            join_set.abort_all();
                            return Err(e);
                        }
                        Some(Err(e)) if e.is_cancelled() => {}
                        Some(Err(e)) => {
                            join_set.abort_all();
                            return Err(SynthesisError::new(SynthesisErrorKind::TaskAborted(
                                e.to_string(),
                            ))
                            .into());
                        }
                    }
                }
            }
        }

        let mut segments = Vec::with_capacity(total);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(segment) => segments.push(segment),
                None => {
                    return Err(SynthesisError::new(SynthesisErrorKind::TaskAborted(format!(
                        "no result for segment {}",
                        index
                    )))
                    .into());
                }
            }
        }
        Ok(segments)
    }
}

/// Synthesize a single unit with bounded retry on transient failures.
async fn synthesize_one(
    backend: &dyn SpeechBackend,
    voice: &VoiceConfig,
    index: usize,
    unit: SpokenUnit,
    max_retries: usize,
) -> QuizreelResult<(usize, NarrationSegment)> {
    let strategy = ExponentialBackoff::from_millis(500)
        .factor(2)
        .max_delay(std::time::Duration::from_secs(30))
        .map(jitter)
        .take(max_retries);

    let text = unit.text.as_str();
    let spoken = Retry::spawn(strategy, move || async move {
        backend.speak(text, voice).await.map_err(classify_for_retry)
    })
    .await
    .map_err(|e| {
        SynthesisError::new(SynthesisErrorKind::SegmentFailed {
            index,
            attempts: max_retries + 1,
            message: e.to_string(),
        })
    })?;

    if spoken.duration_secs <= 0.0 {
        return Err(SynthesisError::new(SynthesisErrorKind::ImplausibleDuration {
            index,
            duration: format!("{:.3}", spoken.duration_secs),
        })
        .into());
    }

    Ok((
        index,
        NarrationSegment {
            unit_index: unit.unit_index,
            text: unit.text,
            audio: spoken.audio,
            duration_secs: spoken.duration_secs,
            role: unit.role,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizreel_core::QuestionUnit;

    fn quiz() -> QuizSpec {
        QuizSpec {
            units: vec![QuestionUnit {
                prompt: "Largest desert?".into(),
                choices: vec!["Sahara".into(), "Antarctica".into()],
                correct_index: 1,
                duration_hint_secs: None,
            }],
        }
    }

    #[test]
    fn spoken_units_without_choices() {
        let units = spoken_units(&quiz(), false);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].role, SegmentRole::Question);
        assert_eq!(units[1].role, SegmentRole::AnswerReveal);
        assert_eq!(units[1].text, "The answer is: Antarctica");
    }

    #[test]
    fn spoken_units_with_choices_interleave() {
        let units = spoken_units(&quiz(), true);
        assert_eq!(units.len(), 4);
        assert_eq!(units[1].role, SegmentRole::Choice);
        assert_eq!(units[1].text, "Choice 1: Sahara");
        assert_eq!(units[2].text, "Choice 2: Antarctica");
        assert!(units.iter().all(|u| u.unit_index == 0));
    }
}
