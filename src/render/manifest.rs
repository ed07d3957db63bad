// SYNOID Manifest Renderer
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Writes each render request to disk (JSON plus optional SRT) for an
// external encoder to pick up.

use super::{ClipRenderer, RenderRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs as tfs;
use tracing::info;

pub struct ManifestRenderer {
    output_dir: PathBuf,
}

impl ManifestRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl ClipRenderer for ManifestRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<PathBuf> {
        tfs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let manifest_path = self.output_dir.join(format!("{}.json", request.clip_id));
        let json = serde_json::to_string_pretty(request)?;
        tfs::write(&manifest_path, json)
            .await
            .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

        if let Some(srt) = &request.captions_srt {
            let srt_path = manifest_path.with_extension("srt");
            tfs::write(&srt_path, srt)
                .await
                .with_context(|| format!("Failed to write {}", srt_path.display()))?;
        }

        info!(
            "[RENDER] Manifest for {:?} ({:.2}s -> {:.2}s) at {:?}",
            request.title, request.start_time, request.end_time, manifest_path
        );
        Ok(manifest_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::{ClipSegment, SegmentType};

    #[tokio::test]
    async fn test_writes_manifest_and_captions() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ManifestRenderer::new(dir.path().join("out"));
        let segment = |start: f64, end: f64, kind| ClipSegment {
            start_time: start,
            end_time: end,
            text: String::new(),
            segment_type: kind,
        };
        let request = RenderRequest {
            video_id: "vid".into(),
            clip_id: "clip-42".into(),
            title: "Title".into(),
            start_time: 0.0,
            end_time: 20.0,
            segments: vec![
                segment(0.0, 3.0, SegmentType::Hook),
                segment(3.0, 18.0, SegmentType::Body),
                segment(18.0, 20.0, SegmentType::LoopEnding),
            ],
            captions_srt: Some("1\n00:00:00,000 --> 00:00:01,000\nHi\n\n".into()),
        };

        let path = renderer.render(&request).await.unwrap();
        assert!(path.ends_with("clip-42.json"));

        let written: RenderRequest =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.segments.len(), 3);
        assert_eq!(written.segments[2].segment_type, SegmentType::LoopEnding);
        assert!(path.with_extension("srt").exists());
    }
}
