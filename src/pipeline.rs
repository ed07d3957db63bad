// SYNOID Clip Pipeline - Find, then refine
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// A run is all-or-nothing at the return boundary: clips are only handed out
// once refinement has finished.

use crate::clipper::transcript::validate_words;
use crate::clipper::{
    BoundaryRefiner, CandidateFinder, ClipSuggestion, FuzzyPhraseLocator, LlmSpanGenerator,
    RefineError, TranscriptSegment, WordTimestamp,
};
use crate::config::ClipperConfig;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ClipRun {
    /// Ranked candidates handed to the refiner.
    pub candidates: usize,
    pub clips: Vec<ClipSuggestion>,
}

pub struct ClipPipeline {
    finder: CandidateFinder,
    refiner: BoundaryRefiner,
}

impl ClipPipeline {
    pub fn new(finder: CandidateFinder, refiner: BoundaryRefiner) -> Self {
        Self { finder, refiner }
    }

    /// LLM generator and fuzzy locator wired from config.
    pub fn from_config(config: &ClipperConfig) -> Self {
        let generator = Arc::new(LlmSpanGenerator::new(config.llm.clone()));
        let locator = Arc::new(FuzzyPhraseLocator::default());
        Self {
            finder: CandidateFinder::new(config.finder.clone(), generator),
            refiner: BoundaryRefiner::new(config.refiner.clone(), locator),
        }
    }

    pub async fn run(
        &self,
        words: &[WordTimestamp],
        segments: Option<&[TranscriptSegment]>,
        max_clips: usize,
    ) -> Result<ClipRun, RefineError> {
        // Reject a broken timeline before spending generator calls on it.
        validate_words(words)?;

        let candidates = self.finder.find(words, max_clips).await;
        let clips = self
            .refiner
            .refine(&candidates, words, segments, max_clips)
            .await?;

        if clips.is_empty() {
            warn!("[PIPELINE] No usable segments found");
        } else {
            info!(
                "[PIPELINE] {} clips from {} candidates",
                clips.len(),
                candidates.len()
            );
        }

        Ok(ClipRun {
            candidates: candidates.len(),
            clips,
        })
    }

    /// `run` under an overall deadline. On timeout nothing is returned.
    pub async fn run_with_timeout(
        &self,
        words: &[WordTimestamp],
        segments: Option<&[TranscriptSegment]>,
        max_clips: usize,
        limit: Duration,
    ) -> Result<ClipRun> {
        match tokio::time::timeout(limit, self.run(words, segments, max_clips)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(anyhow!("Clip run timed out after {:?}", limit)),
        }
    }
}
