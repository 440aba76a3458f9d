//! Audio-driven timeline computation and duration policy.

use quizreel_core::{
    NarrationSegment, OverlaySpec, QuizSpec, SegmentRole, Timeline, TimelineEntry, TimingConfig,
    VideoConfig,
};
use quizreel_error::{QuizreelResult, RenderError, RenderErrorKind};

/// Gap inserted before segment `index`, given its role.
///
/// The countdown replaces the ordinary pause before an answer reveal; a
/// zero countdown falls back to the ordinary pause. The first segment has
/// no gap.
fn gap_before(index: usize, role: SegmentRole, timing: &TimingConfig) -> f64 {
    if index == 0 {
        return 0.0;
    }
    if role == SegmentRole::AnswerReveal && timing.countdown_secs > 0.0 {
        timing.countdown_secs
    } else {
        timing.segment_pause_secs
    }
}

/// Overlay for a segment, derived from its question unit.
fn overlay_for(quiz: &QuizSpec, segment: &NarrationSegment) -> QuizreelResult<OverlaySpec> {
    let unit = quiz.units.get(segment.unit_index).ok_or_else(|| {
        RenderError::new(RenderErrorKind::Staging(format!(
            "segment references missing question unit {}",
            segment.unit_index
        )))
    })?;

    let overlay = match segment.role {
        SegmentRole::Question | SegmentRole::Choice => OverlaySpec::QuestionCard {
            prompt: unit.prompt.clone(),
            choices: unit.choices.clone(),
        },
        SegmentRole::AnswerReveal => OverlaySpec::AnswerCard {
            prompt: unit.prompt.clone(),
            choices: unit.choices.clone(),
            correct_index: unit.correct_index,
        },
    };
    Ok(overlay)
}

/// Schedule the first `count` segments, accumulating durations and gaps.
fn schedule(
    quiz: &QuizSpec,
    segments: &[NarrationSegment],
    timing: &TimingConfig,
    count: usize,
) -> QuizreelResult<(Vec<TimelineEntry>, f64)> {
    let mut entries = Vec::with_capacity(count);
    let mut cursor = 0.0;

    for (index, segment) in segments[..count].iter().enumerate() {
        cursor += gap_before(index, segment.role, timing);
        let start = cursor;
        let end = start + segment.duration_secs;
        entries.push(TimelineEntry {
            segment_index: index,
            start_secs: start,
            end_secs: end,
            overlay: overlay_for(quiz, segment)?,
        });
        cursor = end;
    }

    Ok((entries, cursor))
}

/// Compute the timeline for a run, applying the maximum-duration policy.
///
/// Start offsets accumulate measured segment durations plus configured
/// gaps, which yields exact audio-driven synchronization: overlays appear
/// and disappear at the boundaries of the audio that narrates them.
///
/// When the scheduled total exceeds `video.max_duration_secs`, trailing
/// segments are dropped one at a time and the schedule is recomputed from
/// the remaining segments; narration audio is never stretched, compressed,
/// or internally re-timed. Timelines below the configured minimum are left
/// untouched here; composition pads them by looping background elements.
///
/// # Errors
///
/// Returns `RenderError` when even a single segment cannot fit inside the
/// configured maximum, or when a segment references a missing question
/// unit.
#[tracing::instrument(skip_all, fields(segments = segments.len()))]
pub fn compute_timeline(
    quiz: &QuizSpec,
    segments: &[NarrationSegment],
    timing: &TimingConfig,
    video: &VideoConfig,
) -> QuizreelResult<Timeline> {
    let mut keep = segments.len();
    if keep == 0 {
        return Err(RenderError::new(RenderErrorKind::DurationPolicy(
            "no narration segments to schedule".to_string(),
        ))
        .into());
    }

    loop {
        let (entries, total) = schedule(quiz, segments, timing, keep)?;

        if total <= video.max_duration_secs {
            let truncated = segments.len() - keep;
            if truncated > 0 {
                tracing::warn!(
                    truncated,
                    total_secs = total,
                    max_secs = video.max_duration_secs,
                    "Dropped trailing segments to satisfy maximum duration"
                );
            }
            return Ok(Timeline {
                entries,
                total_secs: total,
                truncated,
            });
        }

        if keep == 1 {
            return Err(RenderError::new(RenderErrorKind::DurationPolicy(format!(
                "leading segment alone runs {:.2}s, over the {:.2}s maximum",
                total, video.max_duration_secs
            )))
            .into());
        }
        keep -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizreel_core::QuestionUnit;

    fn quiz(units: usize) -> QuizSpec {
        QuizSpec {
            units: (0..units)
                .map(|i| QuestionUnit {
                    prompt: format!("Question {}", i),
                    choices: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    correct_index: 1,
                    duration_hint_secs: None,
                })
                .collect(),
        }
    }

    fn segment(unit_index: usize, role: SegmentRole, duration_secs: f64) -> NarrationSegment {
        NarrationSegment {
            unit_index,
            text: "spoken".to_string(),
            audio: vec![0u8; 16],
            duration_secs,
            role,
        }
    }

    fn qa_segments(durations: &[f64]) -> Vec<NarrationSegment> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let role = if i % 2 == 0 {
                    SegmentRole::Question
                } else {
                    SegmentRole::AnswerReveal
                };
                segment(i / 2, role, d)
            })
            .collect()
    }

    fn timing(pause: f64, countdown: f64) -> TimingConfig {
        TimingConfig {
            segment_pause_secs: pause,
            countdown_secs: countdown,
        }
    }

    fn video(max: f64) -> VideoConfig {
        VideoConfig {
            width: 1080,
            height: 1920,
            fps: 30,
            max_duration_secs: max,
            min_duration_secs: 0.0,
        }
    }

    #[test]
    fn total_is_sum_of_durations_and_pauses() {
        // Three questions, two segments each: spec end-to-end scenario 1
        let durations = [3.0, 1.5, 2.0, 1.5, 2.5, 1.5];
        let segments = qa_segments(&durations);
        let timeline =
            compute_timeline(&quiz(3), &segments, &timing(0.5, 0.0), &video(15.0)).unwrap();

        assert_eq!(timeline.entries.len(), 6);
        assert_eq!(timeline.truncated, 0);
        assert!((timeline.total_secs - 14.5).abs() < 1e-9);
    }

    #[test]
    fn entries_are_contiguous_and_non_overlapping() {
        let durations = [3.0, 1.5, 2.0, 1.5, 2.5, 1.5];
        let segments = qa_segments(&durations);
        let timeline =
            compute_timeline(&quiz(3), &segments, &timing(0.5, 0.0), &video(15.0)).unwrap();

        let mut prev_end = 0.0;
        for entry in &timeline.entries {
            assert!(entry.start_secs >= prev_end);
            assert!(entry.end_secs > entry.start_secs);
            // Gap equals the configured pause exactly (first entry has none)
            if entry.segment_index > 0 {
                assert!((entry.start_secs - prev_end - 0.5).abs() < 1e-9);
            }
            prev_end = entry.end_secs;
        }
    }

    #[test]
    fn truncation_drops_trailing_segments_until_under_max() {
        // Spec end-to-end scenario 2: same run, max 10s
        let durations = [3.0, 1.5, 2.0, 1.5, 2.5, 1.5];
        let segments = qa_segments(&durations);
        let timeline =
            compute_timeline(&quiz(3), &segments, &timing(0.5, 0.0), &video(10.0)).unwrap();

        // Dropping the last two segments leaves 8.0s of audio + 3 pauses
        assert_eq!(timeline.truncated, 2);
        assert_eq!(timeline.entries.len(), 4);
        assert!((timeline.total_secs - 9.5).abs() < 1e-9);
        assert!(timeline.total_secs <= 10.0);
    }

    #[test]
    fn truncation_preserves_remaining_segment_timing() {
        let durations = [3.0, 1.5, 2.0, 1.5, 2.5, 1.5];
        let segments = qa_segments(&durations);
        let full =
            compute_timeline(&quiz(3), &segments, &timing(0.5, 0.0), &video(15.0)).unwrap();
        let truncated =
            compute_timeline(&quiz(3), &segments, &timing(0.5, 0.0), &video(10.0)).unwrap();

        // Surviving entries keep exactly the boundaries they had untruncated
        for (kept, original) in truncated.entries.iter().zip(full.entries.iter()) {
            assert!((kept.start_secs - original.start_secs).abs() < 1e-9);
            assert!((kept.end_secs - original.end_secs).abs() < 1e-9);
        }
    }

    #[test]
    fn countdown_replaces_pause_before_answer_reveal() {
        let segments = qa_segments(&[4.0, 2.0]);
        let timeline =
            compute_timeline(&quiz(1), &segments, &timing(0.5, 3.0), &video(60.0)).unwrap();

        assert!((timeline.entries[1].start_secs - 7.0).abs() < 1e-9);
        assert!((timeline.total_secs - 9.0).abs() < 1e-9);
    }

    #[test]
    fn single_oversized_segment_fails_duration_policy() {
        let segments = vec![segment(0, SegmentRole::Question, 30.0)];
        let result = compute_timeline(&quiz(1), &segments, &timing(0.5, 0.0), &video(10.0));
        assert!(result.is_err());
    }

    #[test]
    fn answer_overlay_highlights_correct_choice() {
        let segments = qa_segments(&[2.0, 1.0]);
        let timeline =
            compute_timeline(&quiz(1), &segments, &timing(0.5, 0.0), &video(60.0)).unwrap();

        match &timeline.entries[1].overlay {
            OverlaySpec::AnswerCard { correct_index, .. } => assert_eq!(*correct_index, 1),
            other => panic!("expected answer card, got {:?}", other),
        }
    }
}
