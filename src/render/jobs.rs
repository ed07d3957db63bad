// SYNOID Render Job Store
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Render jobs are tracked by id in a store handed to whoever submits them,
// so nothing about job state lives in globals.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

pub type JobId = Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed { output: PathBuf },
    Failed(String),
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderJob {
    pub id: JobId,
    pub clip_id: String,
    pub video_id: String,
    pub status: JobStatus,
    pub created_at: u64,
}

impl RenderJob {
    pub fn queued(clip_id: &str, video_id: &str) -> Self {
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            id: Uuid::new_v4(),
            clip_id: clip_id.to_string(),
            video_id: video_id.to_string(),
            status: JobStatus::Queued,
            created_at,
        }
    }
}

pub trait JobStore: Send + Sync {
    fn insert(&self, job: RenderJob);
    /// Returns false if the id is unknown.
    fn update(&self, id: JobId, status: JobStatus) -> bool;
    fn get(&self, id: JobId) -> Option<RenderJob>;
    fn list(&self) -> Vec<RenderJob>;
}

#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<JobId, RenderJob>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn jobs(&self) -> std::sync::MutexGuard<'_, HashMap<JobId, RenderJob>> {
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl JobStore for InMemoryJobStore {
    fn insert(&self, job: RenderJob) {
        self.jobs().insert(job.id, job);
    }

    fn update(&self, id: JobId, status: JobStatus) -> bool {
        match self.jobs().get_mut(&id) {
            Some(job) => {
                job.status = status;
                true
            }
            None => false,
        }
    }

    fn get(&self, id: JobId) -> Option<RenderJob> {
        self.jobs().get(&id).cloned()
    }

    fn list(&self) -> Vec<RenderJob> {
        let mut jobs: Vec<RenderJob> = self.jobs().values().cloned().collect();
        jobs.sort_by_key(|j| j.created_at);
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_lifecycle() {
        let store = InMemoryJobStore::new();
        let job = RenderJob::queued("clip-1", "video-1");
        let id = job.id;
        store.insert(job);

        assert_eq!(store.get(id).unwrap().status, JobStatus::Queued);
        assert!(store.update(id, JobStatus::Processing));
        assert!(!store.get(id).unwrap().status.is_finished());
        assert!(store.update(id, JobStatus::Failed("encoder crashed".into())));
        assert!(store.get(id).unwrap().status.is_finished());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_unknown_id_is_not_updated() {
        let store = InMemoryJobStore::new();
        assert!(!store.update(Uuid::new_v4(), JobStatus::Processing));
        assert!(store.get(Uuid::new_v4()).is_none());
    }
}
