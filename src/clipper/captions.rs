// SYNOID Clip Captions - Clip-relative SRT export
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use super::clip::ClipSuggestion;
use super::transcript::WordTimestamp;

const MAX_WORDS_PER_CUE: usize = 7;
const CUE_PAUSE_SECONDS: f64 = 0.5;

/// SRT for one clip, with times shifted so the clip starts at zero.
///
/// Words are grouped into cues of up to seven words, breaking early at a
/// pause or a sentence end.
pub fn clip_srt(clip: &ClipSuggestion, words: &[WordTimestamp]) -> String {
    let origin = clip.start_time();
    let end = clip.end_time();
    let inside: Vec<&WordTimestamp> = words
        .iter()
        .filter(|w| w.start >= origin && w.start < end)
        .collect();

    let mut cues: Vec<Vec<&WordTimestamp>> = Vec::new();
    let mut current: Vec<&WordTimestamp> = Vec::new();
    for word in inside {
        let flush = match current.last() {
            Some(last) => {
                word.start - last.end > CUE_PAUSE_SECONDS
                    || last.ends_sentence()
                    || current.len() >= MAX_WORDS_PER_CUE
            }
            None => false,
        };
        if flush {
            cues.push(std::mem::take(&mut current));
        }
        current.push(word);
    }
    if !current.is_empty() {
        cues.push(current);
    }

    let mut srt_out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        let (first, last) = match (cue.first(), cue.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => continue,
        };
        let start = format_srt_time(first.start - origin);
        let stop = format_srt_time(last.end.min(end) - origin);
        let text = cue
            .iter()
            .map(|w| w.word.trim())
            .collect::<Vec<_>>()
            .join(" ");
        srt_out.push_str(&format!("{}\n{} --> {}\n{}\n\n", i + 1, start, stop, text));
    }
    srt_out
}

fn format_srt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let mins = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}
