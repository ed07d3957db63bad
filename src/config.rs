// SYNOID Clipper Configuration
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Tunables for candidate finding and boundary refinement. Loaded from JSON
// with per-field defaults, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "clipper_config.json";

/// Boundary refinement thresholds. All times are seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerConfig {
    /// Candidates with less `full_text` than this are skipped.
    pub min_text_chars: usize,
    /// `ending_text` shorter than this is ignored.
    pub min_ending_chars: usize,
    /// Hook starts closer than this to an accepted clip are duplicates.
    pub duplicate_radius: f64,
    /// Added after the located/snapped end to avoid clipping the last word.
    pub end_buffer: f64,
    /// A gap longer than this after a word counts as a sentence boundary.
    pub pause_threshold: f64,
    /// How far past the hook start sentence boundaries are scanned.
    pub scan_window: f64,
    /// How far past the target a forward snap may land.
    pub forward_tolerance: f64,
    /// A backward snap never lands earlier than this after the hook start.
    pub min_body: f64,
    /// Slack past the target for the last-word fallback.
    pub fallback_slack: f64,
    pub min_duration: f64,
    pub max_duration: f64,
    /// Ceiling used when an over-long clip is re-snapped or hard-clipped.
    pub target_max: f64,
    pub hook_max: f64,
    pub hook_ratio: f64,
    pub loop_max: f64,
    pub loop_ratio: f64,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 20,
            min_ending_chars: 10,
            duplicate_radius: 30.0,
            end_buffer: 0.3,
            pause_threshold: 0.5,
            scan_window: 120.0,
            forward_tolerance: 15.0,
            min_body: 20.0,
            fallback_slack: 5.0,
            min_duration: 15.0,
            max_duration: 95.0,
            target_max: 90.0,
            hook_max: 5.0,
            hook_ratio: 0.15,
            loop_max: 3.0,
            loop_ratio: 0.10,
        }
    }
}

/// Windowing and concurrency for the candidate finder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub window_words: usize,
    pub overlap_words: usize,
    pub max_concurrent: usize,
    pub window_timeout_secs: u64,
    /// Free-form style context handed to the generator ("educational", "funny", ...).
    pub style: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            window_words: 1200,
            overlap_words: 150,
            max_concurrent: 4,
            window_timeout_secs: 120,
            style: "engaging".to_string(),
        }
    }
}

impl FinderConfig {
    /// Distance between window starts; never zero.
    pub fn stride(&self) -> usize {
        self.window_words.saturating_sub(self.overlap_words).max(1)
    }
}

/// OpenAI-compatible endpoint used by the span generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:11434/v1".to_string(),
            model: "llama3".to_string(),
            api_key: None,
            temperature: 0.4,
        }
    }
}

impl LlmConfig {
    /// Environment overrides (`SYNOID_LLM_URL`, `SYNOID_LLM_MODEL`, `SYNOID_LLM_API_KEY`).
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("SYNOID_LLM_URL") {
            self.api_url = url;
        }
        if let Ok(model) = std::env::var("SYNOID_LLM_MODEL") {
            self.model = model;
        }
        if let Ok(key) = std::env::var("SYNOID_LLM_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipperConfig {
    pub refiner: RefinerConfig,
    pub finder: FinderConfig,
    pub llm: LlmConfig,
}

impl ClipperConfig {
    /// Load from `path`, else `clipper_config.json` in the working directory,
    /// else the user config dir, else defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match path {
            Some(p) => vec![p.to_path_buf()],
            None => {
                let mut list = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
                if let Some(dir) = dirs::config_dir() {
                    list.push(dir.join("synoid").join(DEFAULT_CONFIG_FILE));
                }
                list
            }
        };

        for candidate in candidates {
            let content = match fs::read_to_string(&candidate) {
                Ok(c) => c,
                Err(_) => continue,
            };
            match serde_json::from_str(&content) {
                Ok(config) => {
                    info!("[CONFIG] Loaded clipper config from {:?}", candidate);
                    return config;
                }
                Err(e) => {
                    warn!("[CONFIG] Ignoring invalid config {:?}: {}", candidate, e);
                }
            }
        }

        info!("[CONFIG] Using default clipper config");
        Self::default()
    }
}
