// SYNOID Clip Transcript - Word-level timing ground truth
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Word timestamps are the only source of time truth for the refiner.
// Coarser provider segments are carried along as advisory hints.

use super::error::RefineError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A single spoken token with its timing in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    #[serde(alias = "text")]
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl WordTimestamp {
    pub fn new(word: &str, start: f64, end: f64) -> Self {
        Self {
            word: word.to_string(),
            start,
            end,
        }
    }

    /// True if the token closes a sentence (`. ? ! …`), ignoring trailing quotes
    /// and brackets.
    pub fn ends_sentence(&self) -> bool {
        let trimmed = self
            .word
            .trim_end_matches(|c: char| matches!(c, '"' | '\'' | ')' | ']' | '”' | '’'));
        trimmed.ends_with('.')
            || trimmed.ends_with('?')
            || trimmed.ends_with('!')
            || trimmed.ends_with('…')
    }
}

/// Provider-supplied coarse range, used only as a boundary hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Checks that a word sequence can be used as time ground truth.
///
/// Every word must have finite times with `start <= end`, and starts must be
/// non-decreasing.
pub fn validate_words(words: &[WordTimestamp]) -> Result<(), RefineError> {
    let mut prev_start = f64::NEG_INFINITY;
    for (index, w) in words.iter().enumerate() {
        if !w.start.is_finite() || !w.end.is_finite() {
            return Err(RefineError::InvalidWord {
                index,
                reason: "non-finite timestamp".to_string(),
            });
        }
        if w.start < 0.0 {
            return Err(RefineError::InvalidWord {
                index,
                reason: format!("negative start {:.3}", w.start),
            });
        }
        if w.end < w.start {
            return Err(RefineError::InvalidWord {
                index,
                reason: format!("end {:.3} precedes start {:.3}", w.end, w.start),
            });
        }
        if w.start < prev_start {
            return Err(RefineError::OutOfOrder {
                index,
                prev: prev_start,
                start: w.start,
            });
        }
        prev_start = w.start;
    }

    Ok(())
}

/// Joins the words whose start falls in `[from, to)`; `inclusive_end` also
/// admits a word starting exactly at `to`.
pub fn text_between(words: &[WordTimestamp], from: f64, to: f64, inclusive_end: bool) -> String {
    words
        .iter()
        .filter(|w| w.start >= from && (w.start < to || (inclusive_end && w.start <= to)))
        .map(|w| w.word.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Index of the first word starting at or after `time`.
pub fn first_index_at(words: &[WordTimestamp], time: f64) -> usize {
    words.partition_point(|w| w.start < time)
}

/// A loaded transcript: words plus whatever segments the provider gave us.
#[derive(Debug, Clone, Default)]
pub struct TranscriptBundle {
    pub words: Vec<WordTimestamp>,
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Words(Vec<WordTimestamp>),
    Whisper { segments: Vec<WhisperSegment> },
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    #[serde(default)]
    start: f64,
    #[serde(default)]
    end: f64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    words: Vec<WordTimestamp>,
}

/// Parses either a flat word array or a WhisperX-style document.
///
/// Whisper segments without word alignment are skipped for words but kept as
/// hints.
pub fn parse_transcript_json(json: &str) -> Result<TranscriptBundle> {
    let file: TranscriptFile =
        serde_json::from_str(json).context("Failed to parse transcript JSON")?;

    let bundle = match file {
        TranscriptFile::Words(words) => TranscriptBundle {
            words,
            segments: Vec::new(),
        },
        TranscriptFile::Whisper { segments } => {
            let mut bundle = TranscriptBundle::default();
            for seg in segments {
                bundle.words.extend(seg.words);
                if !seg.text.trim().is_empty() {
                    bundle.segments.push(TranscriptSegment {
                        start: seg.start,
                        end: seg.end,
                        text: seg.text.trim().to_string(),
                    });
                }
            }
            bundle
        }
    };

    Ok(bundle)
}

pub fn load_transcript(path: &Path) -> Result<TranscriptBundle> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    let bundle = parse_transcript_json(&data)?;
    info!(
        "[TRANSCRIPT] Loaded {} words, {} segments from {:?}",
        bundle.words.len(),
        bundle.segments.len(),
        path
    );
    Ok(bundle)
}

pub fn load_segments(path: &Path) -> Result<Vec<TranscriptSegment>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read segments {}", path.display()))?;
    serde_json::from_str(&data).context("Failed to parse segments JSON")
}
