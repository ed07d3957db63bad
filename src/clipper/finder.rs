// SYNOID Candidate Finder - Windowed span generation and ranking
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Splits a long transcript into overlapping word windows, asks the generator
// about each one concurrently, and pools the results into one ranked list.
// A failing window costs only its own spans.

use super::candidate::{rank_candidates, Candidate};
use super::generator::SpanGenerator;
use super::transcript::WordTimestamp;
use crate::config::FinderConfig;
use futures_util::future::join_all;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptWindow {
    pub index: usize,
    /// Start time of the window's first word.
    pub offset: f64,
    pub words: Range<usize>,
    pub text: String,
}

/// Windows of `window_words` words, each starting `stride()` words after the
/// previous. The last window always reaches the end of the transcript.
pub fn split_windows(words: &[WordTimestamp], config: &FinderConfig) -> Vec<TranscriptWindow> {
    let size = config.window_words.max(1);
    let stride = config.stride();
    let mut windows = Vec::new();
    if words.is_empty() {
        return windows;
    }

    let mut start = 0;
    loop {
        let end = (start + size).min(words.len());
        let text = words[start..end]
            .iter()
            .map(|w| w.word.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        windows.push(TranscriptWindow {
            index: windows.len(),
            offset: words[start].start,
            words: start..end,
            text,
        });
        if end == words.len() {
            break;
        }
        start += stride;
    }
    windows
}

pub struct CandidateFinder {
    config: FinderConfig,
    generator: Arc<dyn SpanGenerator>,
}

impl CandidateFinder {
    pub fn new(config: FinderConfig, generator: Arc<dyn SpanGenerator>) -> Self {
        Self { config, generator }
    }

    /// Ranked pool of at most `2 × max_clips` candidates.
    pub async fn find(&self, words: &[WordTimestamp], max_clips: usize) -> Vec<Candidate> {
        let windows = split_windows(words, &self.config);
        if windows.is_empty() {
            info!("[FINDER] Empty transcript, no candidates");
            return Vec::new();
        }

        info!(
            "[FINDER] Scanning {} windows ({} words, stride {}, style {:?})",
            windows.len(),
            self.config.window_words,
            self.config.stride(),
            self.config.style
        );

        let permits = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let timeout = Duration::from_secs(self.config.window_timeout_secs.max(1));

        let per_window = join_all(windows.iter().map(|window| {
            let permits = permits.clone();
            async move {
                let _permit = permits.acquire().await.ok()?;
                self.scan_window(window, timeout).await
            }
        }))
        .await;

        let failed = per_window.iter().filter(|r| r.is_none()).count();
        // Window order, then generator order: ties rank reproducibly.
        let pool: Vec<Candidate> = per_window.into_iter().flatten().flatten().collect();

        info!(
            "[FINDER] Pooled {} candidates ({} of {} windows failed)",
            pool.len(),
            failed,
            windows.len()
        );

        rank_candidates(pool, max_clips)
    }

    async fn scan_window(&self, window: &TranscriptWindow, timeout: Duration) -> Option<Vec<Candidate>> {
        let call = self.generator.generate(&window.text, &self.config.style);
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(spans)) => Some(
                spans
                    .into_iter()
                    .map(|span| Candidate::from_span(span, window.offset))
                    .collect(),
            ),
            Ok(Err(e)) => {
                warn!("[FINDER] Window {} generator failed: {}", window.index, e);
                None
            }
            Err(_) => {
                warn!(
                    "[FINDER] Window {} timed out after {:?}",
                    window.index, timeout
                );
                None
            }
        }
    }
}
