//! Composition planning: one ffmpeg invocation per rendered video.
//!
//! The plan is pure data built from the timeline and staged input files, so
//! the whole filter graph is testable without running the encoder. Overlay
//! text goes through `textfile=` rather than inline `text=` to sidestep
//! drawtext escaping entirely.

use crate::assets::ResolvedAssets;
use quizreel_core::{Timeline, TimingConfig, VideoConfig};
use quizreel_error::{QuizreelResult, RenderError, RenderErrorKind};
use std::path::{Path, PathBuf};

/// Staged on-disk inputs for one composition, parallel to the timeline.
#[derive(Debug, Clone)]
pub struct StagedInputs {
    /// One WAV per timeline entry, in entry order
    pub narration_wavs: Vec<PathBuf>,
    /// One overlay text file per timeline entry, in entry order
    pub overlay_texts: Vec<PathBuf>,
    /// Subtitle track to burn in, when enabled
    pub subtitles: Option<PathBuf>,
}

/// A fully-specified encoder invocation.
#[derive(Debug, Clone)]
pub struct CompositionPlan {
    args: Vec<String>,
    output_path: PathBuf,
    output_duration_secs: f64,
}

impl CompositionPlan {
    /// Encoder arguments, excluding the program name.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Where the encoder writes its output.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Final video duration: the timeline total, padded up to the
    /// configured minimum by looping background and music.
    pub fn output_duration_secs(&self) -> f64 {
        self.output_duration_secs
    }

    /// Build the encoder invocation for a timeline.
    ///
    /// Inputs: looped background video, looped music, one WAV per entry,
    /// and one tick per countdown gap. The filter graph scales the
    /// background, chains a `drawtext` per entry (enabled over the entry's
    /// interval), optionally burns subtitles, places each narration clip at
    /// its entry offset, and mixes ticks and volume-ducked music under the
    /// narration.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` when the staged inputs do not match the
    /// timeline shape.
    pub fn build(
        timeline: &Timeline,
        staged: &StagedInputs,
        assets: &ResolvedAssets,
        video: &VideoConfig,
        timing: &TimingConfig,
        music_volume: f64,
        output_path: PathBuf,
    ) -> QuizreelResult<Self> {
        let entries = timeline.entries.len();
        if staged.narration_wavs.len() != entries || staged.overlay_texts.len() != entries {
            return Err(RenderError::new(RenderErrorKind::Staging(format!(
                "staged {} wavs / {} overlays for {} timeline entries",
                staged.narration_wavs.len(),
                staged.overlay_texts.len(),
                entries
            )))
            .into());
        }

        let output_duration = timeline.total_secs.max(video.min_duration_secs);
        let countdown_starts = countdown_gap_starts(timeline, timing);

        let mut args: Vec<String> = vec![
            "-y".into(),
            "-hide_banner".into(),
            "-nostdin".into(),
        ];

        // Input 0: background, looped to cover the padded duration
        args.extend(["-stream_loop".into(), "-1".into()]);
        args.extend(["-i".into(), assets.background.display().to_string()]);
        // Input 1: music, looped the same way
        args.extend(["-stream_loop".into(), "-1".into()]);
        args.extend(["-i".into(), assets.music.display().to_string()]);
        // Inputs 2..2+N: narration clips
        for wav in &staged.narration_wavs {
            args.extend(["-i".into(), wav.display().to_string()]);
        }
        // One tick input per countdown gap
        if let Some(tick) = &assets.countdown_tick {
            for _ in &countdown_starts {
                args.extend(["-i".into(), tick.display().to_string()]);
            }
        }

        let filter = build_filter_graph(
            timeline,
            staged,
            video,
            timing,
            music_volume,
            &countdown_starts,
            assets.countdown_tick.is_some(),
        );
        args.extend(["-filter_complex".into(), filter]);

        args.extend(["-map".into(), "[vout]".into()]);
        args.extend(["-map".into(), "[aout]".into()]);
        args.extend(["-t".into(), format!("{:.3}", output_duration)]);
        args.extend(["-r".into(), video.fps.to_string()]);
        args.extend(["-c:v".into(), "libx264".into()]);
        args.extend(["-preset".into(), "veryfast".into()]);
        args.extend(["-pix_fmt".into(), "yuv420p".into()]);
        args.extend(["-c:a".into(), "aac".into()]);
        args.push(output_path.display().to_string());

        Ok(Self {
            args,
            output_path,
            output_duration_secs: output_duration,
        })
    }
}

/// Render an overlay as the text block burned onto the frame.
///
/// Deterministic given the overlay: the prompt, then numbered choices; the
/// answer card marks the correct choice with a leading arrow.
pub fn overlay_card_text(overlay: &quizreel_core::OverlaySpec) -> String {
    use quizreel_core::OverlaySpec;

    match overlay {
        OverlaySpec::QuestionCard { prompt, choices } => {
            let mut text = prompt.clone();
            for (i, choice) in choices.iter().enumerate() {
                text.push_str(&format!("\n{}. {}", i + 1, choice));
            }
            text
        }
        OverlaySpec::AnswerCard {
            prompt,
            choices,
            correct_index,
        } => {
            let mut text = prompt.clone();
            for (i, choice) in choices.iter().enumerate() {
                if i == *correct_index {
                    text.push_str(&format!("\n>> {}. {}", i + 1, choice));
                } else {
                    text.push_str(&format!("\n{}. {}", i + 1, choice));
                }
            }
            text
        }
    }
}

/// Start offsets of countdown gaps: the silence before an entry whose gap
/// was widened to the countdown length.
fn countdown_gap_starts(timeline: &Timeline, timing: &TimingConfig) -> Vec<f64> {
    if timing.countdown_secs <= 0.0 {
        return Vec::new();
    }
    let mut starts = Vec::new();
    for pair in timeline.entries.windows(2) {
        let gap = pair[1].start_secs - pair[0].end_secs;
        if (gap - timing.countdown_secs).abs() < 1e-6 {
            starts.push(pair[0].end_secs);
        }
    }
    starts
}

fn build_filter_graph(
    timeline: &Timeline,
    staged: &StagedInputs,
    video: &VideoConfig,
    timing: &TimingConfig,
    music_volume: f64,
    countdown_starts: &[f64],
    have_tick: bool,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    // Background: fill the frame, then burn overlays per entry interval
    parts.push(format!(
        "[0:v]scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},fps={fps}[v0]",
        w = video.width,
        h = video.height,
        fps = video.fps
    ));

    let mut vlabel = "v0".to_string();
    for (i, entry) in timeline.entries.iter().enumerate() {
        let next = format!("v{}", i + 1);
        parts.push(format!(
            "[{src}]drawtext=textfile={file}:enable='between(t,{start:.3},{end:.3})':\
x=(w-text_w)/2:y=h*0.12:fontsize=54:fontcolor=white:line_spacing=18:\
box=1:boxcolor=black@0.5:boxborderw=24[{next}]",
            src = vlabel,
            file = staged.overlay_texts[i].display(),
            start = entry.start_secs,
            end = entry.end_secs,
            next = next
        ));
        vlabel = next;
    }

    // Countdown digits over each widened gap
    for (c, &start) in countdown_starts.iter().enumerate() {
        let digits = timing.countdown_secs.ceil() as u64;
        let slice = timing.countdown_secs / digits.max(1) as f64;
        for d in 0..digits {
            let next = format!("v{}_c{}_{}", timeline.entries.len(), c, d);
            parts.push(format!(
                "[{src}]drawtext=text={digit}:enable='between(t,{s:.3},{e:.3})':\
x=(w-text_w)/2:y=h*0.45:fontsize=160:fontcolor=yellow:borderw=4:bordercolor=black[{next}]",
                src = vlabel,
                digit = digits - d,
                s = start + d as f64 * slice,
                e = start + (d + 1) as f64 * slice,
                next = next
            ));
            vlabel = next;
        }
    }

    // Burned-in subtitles last, above the cards
    if let Some(srt) = &staged.subtitles {
        parts.push(format!(
            "[{src}]subtitles=filename={file}[vout]",
            src = vlabel,
            file = srt.display()
        ));
    } else {
        parts.push(format!("[{src}]null[vout]", src = vlabel));
    }

    // Narration: delay each clip to its entry start, then sum
    let mut voice_inputs = Vec::new();
    for (i, entry) in timeline.entries.iter().enumerate() {
        let delay_ms = (entry.start_secs * 1000.0).round() as u64;
        parts.push(format!("[{}:a]adelay={}:all=1[a{}]", i + 2, delay_ms, i));
        voice_inputs.push(format!("[a{}]", i));
    }

    // Ticks: delayed to the start of their countdown gap
    if have_tick {
        let tick_base = 2 + timeline.entries.len();
        for (c, &start) in countdown_starts.iter().enumerate() {
            let delay_ms = (start * 1000.0).round() as u64;
            parts.push(format!(
                "[{}:a]adelay={}:all=1[t{}]",
                tick_base + c,
                delay_ms,
                c
            ));
            voice_inputs.push(format!("[t{}]", c));
        }
    }

    parts.push(format!(
        "{}amix=inputs={}:duration=longest:normalize=0[voice]",
        voice_inputs.concat(),
        voice_inputs.len()
    ));

    // Music ducked under narration
    parts.push(format!("[1:a]volume={:.3}[mus]", music_volume));
    parts.push("[voice][mus]amix=inputs=2:duration=longest:normalize=0[aout]".to_string());

    parts.join(";")
}
