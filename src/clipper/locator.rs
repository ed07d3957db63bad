// SYNOID Phrase Locator - Fuzzy text-to-timestamp alignment
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Maps a short phrase onto the word timeline. Generator wording drifts from
// what was actually said, so matching is by in-order token overlap rather
// than substring search.

use super::transcript::{TranscriptSegment, WordTimestamp};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

/// Finds where a phrase was spoken. `Ok(None)` means "not found".
#[async_trait]
pub trait PhraseLocator: Send + Sync {
    async fn locate(
        &self,
        phrase: &str,
        words: &[WordTimestamp],
        hints: Option<&[TranscriptSegment]>,
    ) -> Result<Option<(f64, f64)>>;
}

/// Heuristic aligner: best-scoring word window by longest common token
/// subsequence, with transcript segments as a fallback.
#[derive(Debug, Clone)]
pub struct FuzzyPhraseLocator {
    /// Minimum Dice score (2·LCS / (phrase + window)) for a word window.
    pub min_similarity: f64,
    /// Minimum share of phrase tokens found in order inside a hint segment.
    pub hint_similarity: f64,
}

impl Default for FuzzyPhraseLocator {
    fn default() -> Self {
        Self {
            min_similarity: 0.6,
            hint_similarity: 0.8,
        }
    }
}

impl FuzzyPhraseLocator {
    pub fn new(min_similarity: f64) -> Self {
        Self {
            min_similarity,
            ..Default::default()
        }
    }

    /// Word-level alignment. Earliest window wins among equal scores.
    pub fn align_words(&self, phrase: &str, words: &[WordTimestamp]) -> Option<(f64, f64)> {
        let target = tokenize(phrase);
        if target.is_empty() {
            return None;
        }

        // (index into `words`, normalized token); punctuation-only words drop out
        let tokens: Vec<(usize, String)> = words
            .iter()
            .enumerate()
            .filter_map(|(i, w)| {
                let t = normalize(&w.word);
                (!t.is_empty()).then_some((i, t))
            })
            .collect();
        if tokens.is_empty() {
            return None;
        }

        let m = target.len();
        let min_len = ((m as f64 * 0.75).floor() as usize).max(1);
        let max_len = (m as f64 * 1.25).ceil() as usize;

        let vocabulary: HashSet<&str> = target.iter().map(String::as_str).collect();

        // One LCS row pass per start covers every window length from it.
        let mut prev = vec![0usize; m + 1];
        let mut cur = vec![0usize; m + 1];
        let mut best: Option<(f64, usize, usize)> = None;
        for start in 0..tokens.len() {
            // A window opening on a foreign token never beats the one after it.
            if !vocabulary.contains(tokens[start].1.as_str()) {
                continue;
            }
            prev.iter_mut().for_each(|v| *v = 0);
            let stop = (start + max_len).min(tokens.len());
            for (offset, (_, token)) in tokens[start..stop].iter().enumerate() {
                for j in 1..=m {
                    cur[j] = if target[j - 1] == *token {
                        prev[j - 1] + 1
                    } else {
                        prev[j].max(cur[j - 1])
                    };
                }
                std::mem::swap(&mut prev, &mut cur);

                let len = offset + 1;
                let common = prev[m];
                if len < min_len || common == 0 {
                    continue;
                }
                let score = 2.0 * common as f64 / (m + len) as f64;
                if best.map_or(true, |(s, _, _)| score > s) {
                    best = Some((score, start, start + len - 1));
                }
            }
        }

        let (score, first, last) = best?;
        if score < self.min_similarity {
            debug!("[LOCATOR] Best word match {:.2} below threshold for {:?}", score, phrase);
            return None;
        }

        let first_word = &words[tokens[first].0];
        let last_word = &words[tokens[last].0];
        Some((first_word.start, last_word.end))
    }

    /// Segment-level fallback: the first hint containing enough of the phrase.
    pub fn align_hints(&self, phrase: &str, hints: &[TranscriptSegment]) -> Option<(f64, f64)> {
        let target = tokenize(phrase);
        if target.is_empty() {
            return None;
        }

        let mut best: Option<(f64, &TranscriptSegment)> = None;
        for seg in hints {
            let seg_tokens = tokenize(&seg.text);
            let refs: Vec<&str> = seg_tokens.iter().map(String::as_str).collect();
            let coverage = lcs_len(&target, &refs) as f64 / target.len() as f64;
            if best.map_or(true, |(c, _)| coverage > c) {
                best = Some((coverage, seg));
            }
        }

        match best {
            Some((coverage, seg)) if coverage >= self.hint_similarity => Some((seg.start, seg.end)),
            _ => None,
        }
    }
}

#[async_trait]
impl PhraseLocator for FuzzyPhraseLocator {
    async fn locate(
        &self,
        phrase: &str,
        words: &[WordTimestamp],
        hints: Option<&[TranscriptSegment]>,
    ) -> Result<Option<(f64, f64)>> {
        if let Some(range) = self.align_words(phrase, words) {
            return Ok(Some(range));
        }
        Ok(hints.and_then(|h| self.align_hints(phrase, h)))
    }
}

fn normalize(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}

fn lcs_len<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for x in a {
        let mut diag = 0;
        for (j, y) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x.as_ref() == y.as_ref() {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}
