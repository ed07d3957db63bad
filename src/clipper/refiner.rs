// SYNOID Boundary Refiner - Greedy clip acceptance over ranked candidates
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Turns untrusted candidate spans into validated clips. Candidates are taken
// strictly in the order given; each acceptance narrows what later candidates
// may claim, so the input order decides which near-duplicate wins.

use super::candidate::{scale_score, Candidate};
use super::clip::ClipSuggestion;
use super::error::RefineError;
use super::locator::PhraseLocator;
use super::transcript::{first_index_at, validate_words, TranscriptSegment, WordTimestamp};
use crate::config::RefinerConfig;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A time range already claimed by an accepted clip in this run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedRange {
    pub start: f64,
    pub end: f64,
}

/// Why a candidate was dropped. Logged, never returned.
#[derive(Debug, Clone, PartialEq)]
enum Skip {
    ThinText(usize),
    HookNotFound,
    NearDuplicate { hook_start: f64, accepted_start: f64 },
    NoEnd,
    TooShort(f64),
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::ThinText(chars) => write!(f, "full text too thin ({} chars)", chars),
            Skip::HookNotFound => write!(f, "hook phrase not found in transcript"),
            Skip::NearDuplicate {
                hook_start,
                accepted_start,
            } => write!(
                f,
                "hook at {:.2}s too close to accepted clip at {:.2}s",
                hook_start, accepted_start
            ),
            Skip::NoEnd => write!(f, "no usable end point"),
            Skip::TooShort(d) => write!(f, "duration {:.2}s below minimum", d),
        }
    }
}

pub struct BoundaryRefiner {
    config: RefinerConfig,
    locator: Arc<dyn PhraseLocator>,
}

impl BoundaryRefiner {
    pub fn new(config: RefinerConfig, locator: Arc<dyn PhraseLocator>) -> Self {
        Self { config, locator }
    }

    pub fn config(&self) -> &RefinerConfig {
        &self.config
    }

    /// Accept up to `max_clips` candidates, in input order.
    ///
    /// Fails only when `words` cannot serve as a timeline. Every other problem
    /// skips the candidate; an empty result is a normal outcome.
    pub async fn refine(
        &self,
        candidates: &[Candidate],
        words: &[WordTimestamp],
        segments: Option<&[TranscriptSegment]>,
        max_clips: usize,
    ) -> Result<Vec<ClipSuggestion>, RefineError> {
        validate_words(words)?;
        if words.is_empty() {
            info!("[REFINER] Empty transcript, nothing to refine");
            return Ok(Vec::new());
        }

        info!(
            "[REFINER] Refining {} candidates over {} words (max {} clips)",
            candidates.len(),
            words.len(),
            max_clips
        );

        let mut accepted: Vec<AcceptedRange> = Vec::new();
        let mut clips: Vec<ClipSuggestion> = Vec::new();

        for (rank, candidate) in candidates.iter().enumerate() {
            if clips.len() >= max_clips {
                debug!(
                    "[REFINER] Reached {} clips, leaving {} candidates unevaluated",
                    max_clips,
                    candidates.len() - rank
                );
                break;
            }

            let (start, end) = match self.place(candidate, words, segments, &accepted).await {
                Ok(span) => span,
                Err(skip) => {
                    debug!("[REFINER] Skipping #{} {:?}: {}", rank, candidate.title, skip);
                    continue;
                }
            };

            accepted.push(AcceptedRange { start, end });
            let clip = ClipSuggestion::partition(
                candidate.title.clone(),
                candidate.why_viral.clone(),
                scale_score(candidate.viral_score),
                start,
                end,
                words,
                &self.config,
            );

            info!(
                "[REFINER] Accepted #{} {:?}: {:.2}s -> {:.2}s ({:.1}s, score {:.0})",
                rank, clip.title, start, end, clip.total_duration, clip.viral_score
            );
            clips.push(clip);
        }

        info!("[REFINER] {} clips accepted", clips.len());
        Ok(clips)
    }

    /// Resolve a candidate to `(hook_start, segment_end)` against the current
    /// accepted set.
    async fn place(
        &self,
        candidate: &Candidate,
        words: &[WordTimestamp],
        segments: Option<&[TranscriptSegment]>,
        accepted: &[AcceptedRange],
    ) -> Result<(f64, f64), Skip> {
        let cfg = &self.config;

        let text_chars = candidate.full_text.trim().chars().count();
        if text_chars < cfg.min_text_chars {
            return Err(Skip::ThinText(text_chars));
        }

        let (hook_start, hook_end) = self
            .locate_hook(candidate, words, segments)
            .await
            .ok_or(Skip::HookNotFound)?;

        // Hook-start proximity is the only dedup test; body overlap is not checked.
        if let Some(prior) = accepted
            .iter()
            .find(|r| (hook_start - r.start).abs() < cfg.duplicate_radius)
        {
            return Err(Skip::NearDuplicate {
                hook_start,
                accepted_start: prior.start,
            });
        }

        let end = match self.locate_ending(candidate, hook_end, words, segments).await {
            Some(ending_end) => ending_end + cfg.end_buffer,
            None => {
                self.snap_end(words, hook_start, candidate.estimated_seconds)
                    .ok_or(Skip::NoEnd)?
                    + cfg.end_buffer
            }
        };

        let duration = end - hook_start;
        if duration < cfg.min_duration {
            return Err(Skip::TooShort(duration));
        }

        let end = if duration > cfg.max_duration {
            self.clamp_end(words, hook_start, end)
        } else {
            end
        };

        Ok((hook_start, end))
    }

    /// Locator call with collaborator errors folded into "not found".
    async fn locate(
        &self,
        phrase: &str,
        words: &[WordTimestamp],
        hints: Option<&[TranscriptSegment]>,
    ) -> Option<(f64, f64)> {
        if phrase.trim().is_empty() {
            return None;
        }
        match self.locator.locate(phrase, words, hints).await {
            Ok(Some((start, end))) if start.is_finite() && end.is_finite() && end >= start => {
                Some((start, end))
            }
            Ok(Some((start, end))) => {
                warn!(
                    "[REFINER] Locator returned unusable range {:.3}..{:.3} for {:?}",
                    start, end, phrase
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("[REFINER] Locator failed for {:?}: {}", phrase, e);
                None
            }
        }
    }

    /// Hook range, looked up from the candidate's source window onwards first.
    ///
    /// The generator only saw that window, so a repeat of the phrase earlier
    /// in the transcript is the wrong occurrence. The whole transcript is
    /// searched only when the window yields nothing.
    async fn locate_hook(
        &self,
        candidate: &Candidate,
        words: &[WordTimestamp],
        segments: Option<&[TranscriptSegment]>,
    ) -> Option<(f64, f64)> {
        let offset = candidate.window_offset;
        if offset.is_finite() && offset > 0.0 {
            let from = first_index_at(words, offset);
            let hints = segments.map(|segs| segments_ending_after(segs, offset));
            if let Some(range) = self
                .locate(&candidate.hook_text, &words[from..], hints.as_deref())
                .await
            {
                return Some(range);
            }
            debug!(
                "[REFINER] Hook {:?} not found after window offset {:.2}s, searching all",
                candidate.title, offset
            );
        }
        self.locate(&candidate.hook_text, words, segments).await
    }

    /// End of the explicit ending phrase, searched only after the hook.
    async fn locate_ending(
        &self,
        candidate: &Candidate,
        hook_end: f64,
        words: &[WordTimestamp],
        segments: Option<&[TranscriptSegment]>,
    ) -> Option<f64> {
        let ending = candidate.ending_text.trim();
        if ending.chars().count() < self.config.min_ending_chars {
            return None;
        }

        // A loop ending may repeat the hook; the hook's own words must not match.
        let tail = &words[first_index_at(words, hook_end)..];
        let tail_hints: Option<Vec<TranscriptSegment>> = segments.map(|segs| {
            segs.iter()
                .filter(|s| s.start >= hook_end)
                .cloned()
                .collect()
        });

        let (_, ending_end) = self.locate(ending, tail, tail_hints.as_deref()).await?;
        Some(ending_end)
    }

    /// Word end times in `[hook_start, hook_start + scan_window]` that close a
    /// sentence or are followed by a long pause. Ascending.
    pub fn sentence_boundaries(&self, words: &[WordTimestamp], hook_start: f64) -> Vec<f64> {
        let limit = hook_start + self.config.scan_window;
        let from = first_index_at(words, hook_start);

        let mut boundaries = Vec::new();
        for i in from..words.len() {
            let word = &words[i];
            if word.start > limit {
                break;
            }
            if word.end > limit {
                continue;
            }
            // The last spoken word closes the transcript.
            let paused = words
                .get(i + 1)
                .map_or(true, |next| next.start - word.end > self.config.pause_threshold);
            if word.ends_sentence() || paused {
                boundaries.push(word.end);
            }
        }
        boundaries
    }

    /// Natural stopping point near `hook_start + estimated_seconds`, before
    /// the end buffer is applied.
    pub fn snap_end(
        &self,
        words: &[WordTimestamp],
        hook_start: f64,
        estimated_seconds: f64,
    ) -> Option<f64> {
        let cfg = &self.config;
        let estimate = if estimated_seconds.is_finite() {
            estimated_seconds.max(0.0)
        } else {
            0.0
        };
        let target = hook_start + estimate;
        let boundaries = self.sentence_boundaries(words, hook_start);

        if let Some(&after) = boundaries
            .iter()
            .find(|&&b| b > target && b <= target + cfg.forward_tolerance)
        {
            return Some(after);
        }

        let floor = hook_start + cfg.min_body;
        if let Some(&before) = boundaries
            .iter()
            .rev()
            .find(|&&b| b <= target && b >= floor)
        {
            return Some(before);
        }

        // Ignore sentence structure: cover whatever was said up to the slack.
        let reach = target + cfg.fallback_slack;
        words[first_index_at(words, hook_start)..]
            .iter()
            .take_while(|w| w.start <= reach)
            .filter(|w| w.end <= reach)
            .map(|w| w.end)
            .last()
    }

    /// Pull an over-long end back inside `hook_start + target_max`.
    fn clamp_end(&self, words: &[WordTimestamp], hook_start: f64, end: f64) -> f64 {
        let cfg = &self.config;
        let ceiling = hook_start + cfg.target_max;
        let floor = hook_start + cfg.min_body;

        let resnapped = self
            .sentence_boundaries(words, hook_start)
            .into_iter()
            .rev()
            .find(|&b| b >= floor && b <= ceiling);

        match resnapped {
            Some(boundary) => {
                debug!(
                    "[REFINER] {:.1}s clip re-snapped to boundary at {:.2}s",
                    end - hook_start,
                    boundary
                );
                (boundary + cfg.end_buffer).min(ceiling)
            }
            None => {
                debug!(
                    "[REFINER] {:.1}s clip hard-clipped to {:.0}s",
                    end - hook_start,
                    cfg.target_max
                );
                ceiling
            }
        }
    }
}

fn segments_ending_after(segments: &[TranscriptSegment], time: f64) -> Vec<TranscriptSegment> {
    segments.iter().filter(|s| s.end > time).cloned().collect()
}
