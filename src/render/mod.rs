// SYNOID Render Hand-off
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Accepted clips leave the clipper as render requests. Encoding itself is
// the renderer's business; this module only shapes the request and tracks
// the job.

pub mod jobs;
pub mod manifest;
pub mod queue;

pub use jobs::{InMemoryJobStore, JobId, JobStatus, JobStore, RenderJob};
pub use manifest::ManifestRenderer;
pub use queue::RenderQueue;

use crate::clipper::captions::clip_srt;
use crate::clipper::{ClipSegment, ClipSuggestion, WordTimestamp};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a renderer needs for one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    pub video_id: String,
    pub clip_id: String,
    pub title: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Hook, body, loop-ending in timeline order.
    pub segments: Vec<ClipSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captions_srt: Option<String>,
}

impl RenderRequest {
    pub fn from_clip(video_id: &str, clip: &ClipSuggestion, words: Option<&[WordTimestamp]>) -> Self {
        Self {
            video_id: video_id.to_string(),
            clip_id: clip.clip_id.clone(),
            title: clip.title.clone(),
            start_time: clip.start_time(),
            end_time: clip.end_time(),
            segments: clip.segments().cloned().collect(),
            captions_srt: words.map(|w| clip_srt(clip, w)),
        }
    }
}

/// Produces a rendered artifact for a request and returns where it landed.
#[async_trait]
pub trait ClipRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<PathBuf>;
}
