// SYNOID Render Queue
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use super::jobs::{JobId, JobStatus, JobStore, RenderJob};
use super::{ClipRenderer, RenderRequest};
use crate::clipper::{ClipSuggestion, WordTimestamp};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Runs each submitted clip through the renderer on its own task, recording
/// progress in the injected job store.
pub struct RenderQueue {
    store: Arc<dyn JobStore>,
    renderer: Arc<dyn ClipRenderer>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl RenderQueue {
    pub fn new(store: Arc<dyn JobStore>, renderer: Arc<dyn ClipRenderer>) -> Self {
        Self {
            store,
            renderer,
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Queue one clip. Must be called inside a tokio runtime.
    pub fn submit(
        &self,
        video_id: &str,
        clip: &ClipSuggestion,
        words: Option<&[WordTimestamp]>,
    ) -> JobId {
        let request = RenderRequest::from_clip(video_id, clip, words);
        let job = RenderJob::queued(&clip.clip_id, video_id);
        let job_id = job.id;
        self.store.insert(job);

        let store = self.store.clone();
        let renderer = self.renderer.clone();
        let handle = tokio::spawn(async move {
            store.update(job_id, JobStatus::Processing);
            let status = match renderer.render(&request).await {
                Ok(output) => {
                    info!("[RENDER] Job {} completed: {:?}", job_id, output);
                    JobStatus::Completed { output }
                }
                Err(e) => {
                    error!("[RENDER] Job {} failed: {}", job_id, e);
                    JobStatus::Failed(e.to_string())
                }
            };
            store.update(job_id, status);
        });

        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(handle);
        job_id
    }

    /// Wait for every job submitted so far.
    pub async fn wait_all(&self) {
        let handles: Vec<JoinHandle<()>> = std::mem::take(
            &mut *self
                .handles
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for handle in handles {
            if let Err(e) = handle.await {
                error!("[RENDER] Render task panicked: {}", e);
            }
        }
    }
}
