// SYNOID Clip Suggestions
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Terminal output of the refiner. A suggestion is only ever built through
// `ClipSuggestion::partition`, so its three segments always tile the span.

use super::transcript::{text_between, WordTimestamp};
use crate::config::RefinerConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    Hook,
    Body,
    LoopEnding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    pub segment_type: SegmentType,
}

impl ClipSegment {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSuggestion {
    pub clip_id: String,
    pub title: String,
    pub hook: ClipSegment,
    pub body_segments: Vec<ClipSegment>,
    pub loop_ending: ClipSegment,
    pub total_duration: f64,
    /// 0-100.
    pub viral_score: f64,
    pub why_viral: String,
}

impl ClipSuggestion {
    /// Splits `[start, end]` into hook / body / loop-ending.
    ///
    /// Hook is `min(hook_max, hook_ratio·d)`, loop-ending is
    /// `min(loop_max, loop_ratio·d)`, body is what lies between.
    pub fn partition(
        title: String,
        why_viral: String,
        viral_score: f64,
        start: f64,
        end: f64,
        words: &[WordTimestamp],
        config: &RefinerConfig,
    ) -> Self {
        let duration = end - start;
        let hook_end = start + (config.hook_max).min(config.hook_ratio * duration);
        let loop_start = end - (config.loop_max).min(config.loop_ratio * duration);
        // Degenerate configs could cross the markers; the body then collapses.
        let loop_start = loop_start.max(hook_end);

        let hook = ClipSegment {
            start_time: start,
            end_time: hook_end,
            text: text_between(words, start, hook_end, false),
            segment_type: SegmentType::Hook,
        };
        let body = ClipSegment {
            start_time: hook_end,
            end_time: loop_start,
            text: text_between(words, hook_end, loop_start, false),
            segment_type: SegmentType::Body,
        };
        let loop_ending = ClipSegment {
            start_time: loop_start,
            end_time: end,
            text: text_between(words, loop_start, end, true),
            segment_type: SegmentType::LoopEnding,
        };

        Self {
            clip_id: uuid::Uuid::new_v4().to_string(),
            title,
            hook,
            body_segments: vec![body],
            loop_ending,
            total_duration: duration,
            viral_score,
            why_viral,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.hook.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.loop_ending.end_time
    }

    /// Hook, bodies, loop-ending in timeline order.
    pub fn segments(&self) -> impl Iterator<Item = &ClipSegment> {
        std::iter::once(&self.hook)
            .chain(self.body_segments.iter())
            .chain(std::iter::once(&self.loop_ending))
    }

    /// Full spoken text across all segments.
    pub fn text(&self) -> String {
        self.segments()
            .map(|s| s.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_every_half_second(until: f64) -> Vec<WordTimestamp> {
        let mut words = Vec::new();
        let mut t = 0.0;
        while t < until {
            words.push(WordTimestamp::new("w", t, t + 0.4));
            t += 0.5;
        }
        words
    }

    #[test]
    fn test_partition_long_clip_caps_hook_and_loop() {
        let words = words_every_half_second(100.0);
        let clip = ClipSuggestion::partition(
            "t".into(),
            "w".into(),
            80.0,
            10.0,
            70.0,
            &words,
            &RefinerConfig::default(),
        );
        assert_eq!(clip.hook.end_time, 15.0);
        assert_eq!(clip.loop_ending.start_time, 67.0);
        assert_eq!(clip.body_segments[0].start_time, clip.hook.end_time);
        assert_eq!(clip.body_segments[0].end_time, clip.loop_ending.start_time);
        assert_eq!(clip.total_duration, 60.0);
    }

    #[test]
    fn test_partition_short_clip_uses_ratios() {
        let words = words_every_half_second(40.0);
        let clip = ClipSuggestion::partition(
            "t".into(),
            "w".into(),
            50.0,
            0.0,
            20.0,
            &words,
            &RefinerConfig::default(),
        );
        assert!((clip.hook.duration() - 3.0).abs() < 1e-9);
        assert!((clip.loop_ending.duration() - 2.0).abs() < 1e-9);
        assert_eq!(clip.segments().count(), 3);
    }

    #[test]
    fn test_segment_text_has_no_duplicates() {
        let words = vec![
            WordTimestamp::new("Listen.", 0.0, 0.4),
            WordTimestamp::new("middle", 10.0, 10.4),
            WordTimestamp::new("end.", 19.5, 19.9),
        ];
        let clip = ClipSuggestion::partition(
            "t".into(),
            "w".into(),
            10.0,
            0.0,
            20.0,
            &words,
            &RefinerConfig::default(),
        );
        assert_eq!(clip.hook.text, "Listen.");
        assert_eq!(clip.body_segments[0].text, "middle");
        assert_eq!(clip.loop_ending.text, "end.");
        assert_eq!(clip.text(), "Listen. middle end.");
    }

    #[test]
    fn test_ids_are_unique() {
        let words = words_every_half_second(30.0);
        let config = RefinerConfig::default();
        let a = ClipSuggestion::partition("a".into(), "".into(), 1.0, 0.0, 20.0, &words, &config);
        let b = ClipSuggestion::partition("a".into(), "".into(), 1.0, 0.0, 20.0, &words, &config);
        assert_ne!(a.clip_id, b.clip_id);
    }

    #[test]
    fn test_segment_type_serializes_snake_case() {
        let json = serde_json::to_string(&SegmentType::LoopEnding).unwrap();
        assert_eq!(json, "\"loop_ending\"");
    }
}
