// SYNOID Clip Candidates
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Generator-proposed spans. Nothing here is trusted: wording may not occur
// verbatim in the transcript and scores are self-reported.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A span as the generator reports it, before window provenance is attached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedSpan {
    #[serde(alias = "text")]
    pub full_text: String,
    #[serde(alias = "hook")]
    pub hook_text: String,
    #[serde(alias = "ending")]
    pub ending_text: String,
    #[serde(alias = "duration")]
    pub estimated_seconds: f64,
    #[serde(alias = "score")]
    pub viral_score: f64,
    pub title: String,
    #[serde(alias = "reason")]
    pub why_viral: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    pub full_text: String,
    pub hook_text: String,
    pub ending_text: String,
    pub estimated_seconds: f64,
    /// Self-reported, nominally 1-10.
    pub viral_score: f64,
    pub title: String,
    pub why_viral: String,
    /// Start time (seconds) of the transcript window this came from.
    pub window_offset: f64,
}

impl Candidate {
    pub fn from_span(span: GeneratedSpan, window_offset: f64) -> Self {
        Self {
            full_text: span.full_text,
            hook_text: span.hook_text,
            ending_text: span.ending_text,
            estimated_seconds: span.estimated_seconds,
            viral_score: span.viral_score,
            title: span.title,
            why_viral: span.why_viral,
            window_offset,
        }
    }
}

/// Maps a 1-10 generator score onto 0-100.
pub fn scale_score(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    (score * 10.0).clamp(0.0, 100.0)
}

/// Stable sort by score, best first, then keep `2 × max_clips`.
///
/// Equal scores keep their pooled order so repeated runs accept the same clips.
pub fn rank_candidates(mut pool: Vec<Candidate>, max_clips: usize) -> Vec<Candidate> {
    pool.sort_by(|a, b| sanitize(b.viral_score).total_cmp(&sanitize(a.viral_score)));
    pool.truncate(max_clips.saturating_mul(2));
    pool
}

fn sanitize(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Extracts the span list from a chat reply.
///
/// Models wrap JSON in prose or Markdown fences, or return an object holding
/// the array under `clips`/`candidates`; all of those are accepted.
pub fn parse_spans(reply: &str) -> Result<Vec<GeneratedSpan>> {
    let trimmed = reply.trim();

    if let Ok(spans) = serde_json::from_str::<Vec<GeneratedSpan>>(trimmed) {
        return Ok(spans);
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["clips", "candidates", "segments"] {
            if let Some(list) = value.get(key) {
                return serde_json::from_value(list.clone())
                    .with_context(|| format!("Malformed '{}' array in reply", key));
            }
        }
    }

    let start = trimmed
        .find('[')
        .context("Reply contains no JSON array")?;
    let end = trimmed
        .rfind(']')
        .filter(|&end| end > start)
        .context("Reply contains an unterminated JSON array")?;

    serde_json::from_str(&trimmed[start..=end]).context("Failed to parse spans from reply")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(title: &str, score: f64) -> Candidate {
        Candidate {
            title: title.to_string(),
            viral_score: score,
            ..Default::default()
        }
    }

    #[test]
    fn test_scale_score() {
        assert_eq!(scale_score(7.0), 70.0);
        assert_eq!(scale_score(12.0), 100.0);
        assert_eq!(scale_score(-1.0), 0.0);
        assert_eq!(scale_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_rank_is_stable_and_truncated() {
        let pool = vec![
            scored("a", 6.0),
            scored("b", 9.0),
            scored("c", 6.0),
            scored("d", 8.0),
            scored("e", 6.0),
        ];
        let ranked = rank_candidates(pool, 2);
        let titles: Vec<_> = ranked.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_nan_scores_sink() {
        let ranked = rank_candidates(vec![scored("nan", f64::NAN), scored("ok", 2.0)], 5);
        assert_eq!(ranked[0].title, "ok");
    }

    #[test]
    fn test_parse_fenced_reply_with_aliases() {
        let reply = "Here you go:\n```json\n[{\"text\": \"Full body text\", \"hook\": \"Listen up\", \
                     \"score\": 8, \"duration\": 35, \"title\": \"T\"}]\n```";
        let spans = parse_spans(reply).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].hook_text, "Listen up");
        assert_eq!(spans[0].viral_score, 8.0);
        assert_eq!(spans[0].estimated_seconds, 35.0);
        assert!(spans[0].ending_text.is_empty());
    }

    #[test]
    fn test_parse_wrapped_object() {
        let reply = r#"{"clips": [{"full_text": "x", "viral_score": 5}]}"#;
        assert_eq!(parse_spans(reply).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_spans("I could not find anything viral.").is_err());
    }
}
