//! SRT subtitle emission from a computed timeline.
//!
//! Cue boundaries come straight from the timeline, so subtitles stay in
//! sync with narration by construction. Word-by-word mode splits each
//! segment's text into per-word cues with uniform timing across the
//! segment's interval.

use quizreel_core::{NarrationSegment, Timeline};

/// Format a second offset as an SRT timestamp (`HH:MM:SS,mmm`).
fn format_timestamp(secs: f64) -> String {
    let total_millis = (secs * 1000.0).round() as u64;
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let s = total_secs % 60;
    let m = (total_secs / 60) % 60;
    let h = total_secs / 3600;
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, millis)
}

fn push_cue(out: &mut String, index: usize, start: f64, end: f64, text: &str) {
    out.push_str(&index.to_string());
    out.push('\n');
    out.push_str(&format_timestamp(start));
    out.push_str(" --> ");
    out.push_str(&format_timestamp(end));
    out.push('\n');
    out.push_str(text);
    out.push_str("\n\n");
}

/// Build the SRT document for a timeline.
///
/// One cue per scheduled segment, or one cue per word when `word_by_word`
/// is set (each word gets an equal share of its segment's interval).
pub fn build_srt(timeline: &Timeline, segments: &[NarrationSegment], word_by_word: bool) -> String {
    let mut out = String::new();
    let mut index = 1;

    for entry in &timeline.entries {
        let Some(segment) = segments.get(entry.segment_index) else {
            continue;
        };

        if word_by_word {
            let words: Vec<&str> = segment.text.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            let per_word = entry.duration_secs() / words.len() as f64;
            let mut cursor = entry.start_secs;
            for word in words {
                push_cue(&mut out, index, cursor, cursor + per_word, word);
                cursor += per_word;
                index += 1;
            }
        } else {
            push_cue(
                &mut out,
                index,
                entry.start_secs,
                entry.end_secs,
                &segment.text,
            );
            index += 1;
        }
    }

    out
}
