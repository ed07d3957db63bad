// SYNOID Span Generator - LLM bridge for clip candidates
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use super::candidate::{parse_spans, GeneratedSpan};
use crate::config::LlmConfig;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

/// Proposes viral-worthy spans for one window of transcript text.
#[async_trait]
pub trait SpanGenerator: Send + Sync {
    async fn generate(&self, window_text: &str, style: &str) -> Result<Vec<GeneratedSpan>>;
}

const SYSTEM_PROMPT: &str = "You are Synoid, a short-form video editor. \
You find the moments in long transcripts that work as standalone clips for \
TikTok, YouTube Shorts and Instagram Reels. Respond with JSON only.";

/// Builds the per-window instruction.
pub fn build_prompt(window_text: &str, style: &str) -> String {
    format!(
        r#"Find the most engaging contiguous passages in this transcript excerpt.
Style to favour: {style}.

Favour strong opening hooks, surprising revelations, emotional beats,
actionable advice and memorable quotes. Each passage should run 20-90 seconds
when spoken and must be a continuous stretch of the excerpt.

Return a JSON array. Each element:
{{
  "full_text": "the passage, copied from the excerpt",
  "hook_text": "the first sentence of the passage, verbatim",
  "ending_text": "the last sentence of the passage, verbatim",
  "estimated_seconds": 45,
  "viral_score": 1-10,
  "title": "short catchy title",
  "why_viral": "one sentence"
}}

Transcript excerpt:
"""
{window_text}
""""#
    )
}

/// OpenAI-compatible chat completion client.
pub struct LlmSpanGenerator {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmSpanGenerator {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": self.config.temperature
        });

        let endpoint = format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'));
        let mut request = self.client.post(&endpoint).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .with_context(|| format!("LLM request to {} failed", endpoint))?;
        if !resp.status().is_success() {
            bail!("LLM API error: {}", resp.status());
        }

        let body: serde_json::Value = resp.json().await.context("LLM reply was not JSON")?;
        // choices[0].message.content
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .context("LLM reply has no message content")
    }
}

#[async_trait]
impl SpanGenerator for LlmSpanGenerator {
    async fn generate(&self, window_text: &str, style: &str) -> Result<Vec<GeneratedSpan>> {
        debug!(
            "[FINDER] Asking {} for spans ({} chars)",
            self.config.model,
            window_text.len()
        );
        let reply = self.complete(&build_prompt(window_text, style)).await?;
        let spans = parse_spans(&reply)?;
        info!("[FINDER] {} proposed {} spans", self.config.model, spans.len());
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_style_and_text() {
        let prompt = build_prompt("we lost everything that year", "emotional");
        assert!(prompt.contains("Style to favour: emotional."));
        assert!(prompt.contains("we lost everything that year"));
        assert!(prompt.contains("\"hook_text\""));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let generator = LlmSpanGenerator::new(LlmConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        });
        assert!(generator.generate("text", "any").await.is_err());
    }
}
