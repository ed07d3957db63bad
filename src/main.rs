// SYNOID Clipper Entry Point
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use synoid_clipper::clipper::transcript::{load_segments, load_transcript};
use synoid_clipper::clipper::{
    split_windows, BoundaryRefiner, Candidate, ClipSuggestion, FuzzyPhraseLocator,
    TranscriptSegment,
};
use synoid_clipper::config::ClipperConfig;
use synoid_clipper::pipeline::ClipPipeline;
use synoid_clipper::render::{InMemoryJobStore, JobStatus, ManifestRenderer, RenderQueue};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "synoid-clipper")]
#[command(about = "SYNOID short-form clip extractor", long_about = None)]
struct Cli {
    /// Config file (defaults to ./clipper_config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refine pre-generated candidates onto word timestamps
    Refine {
        /// Ranked candidate list (JSON array)
        #[arg(short, long)]
        candidates: PathBuf,

        /// Word timestamps (flat array or WhisperX JSON)
        #[arg(short, long)]
        words: PathBuf,

        /// Optional transcript segments used as boundary hints
        #[arg(short, long)]
        segments: Option<PathBuf>,

        #[arg(short, long, default_value_t = 5)]
        max_clips: usize,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Full pipeline: generate candidates with the LLM, then refine
    Find {
        #[arg(short, long)]
        words: PathBuf,

        #[arg(short, long)]
        segments: Option<PathBuf>,

        #[arg(short, long, default_value_t = 5)]
        max_clips: usize,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overall deadline for the run in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Write a render manifest per clip into this directory
        #[arg(long)]
        manifest_dir: Option<PathBuf>,

        /// Source video identifier recorded in render manifests
        #[arg(long, default_value = "source")]
        video_id: String,
    },

    /// Print how a transcript would be windowed for the generator
    Windows {
        #[arg(short, long)]
        words: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,reqwest=warn,hyper=warn");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[SYNOID PANIC] at {}: {}", location, message);
    }));

    let args = Cli::parse();
    let mut config = ClipperConfig::load(args.config.as_deref());
    config.llm.apply_env();

    match args.command {
        Commands::Refine {
            candidates,
            words,
            segments,
            max_clips,
            output,
        } => {
            let transcript = load_transcript(&words)?;
            let hints = resolve_hints(segments.as_deref(), transcript.segments)?;
            let candidates: Vec<Candidate> = serde_json::from_str(
                &std::fs::read_to_string(&candidates)
                    .with_context(|| format!("Failed to read {}", candidates.display()))?,
            )
            .context("Failed to parse candidates JSON")?;

            let refiner = BoundaryRefiner::new(
                config.refiner.clone(),
                Arc::new(FuzzyPhraseLocator::default()),
            );
            let clips = refiner
                .refine(&candidates, &transcript.words, hints.as_deref(), max_clips)
                .await?;

            write_clips(&clips, output.as_deref())?;
        }
        Commands::Find {
            words,
            segments,
            max_clips,
            output,
            timeout,
            manifest_dir,
            video_id,
        } => {
            let transcript = load_transcript(&words)?;
            let hints = resolve_hints(segments.as_deref(), transcript.segments)?;
            let pipeline = ClipPipeline::from_config(&config);

            let run = match timeout {
                Some(secs) => {
                    pipeline
                        .run_with_timeout(
                            &transcript.words,
                            hints.as_deref(),
                            max_clips,
                            Duration::from_secs(secs),
                        )
                        .await?
                }
                None => {
                    pipeline
                        .run(&transcript.words, hints.as_deref(), max_clips)
                        .await?
                }
            };

            if let Some(dir) = manifest_dir {
                let store = Arc::new(InMemoryJobStore::new());
                let queue = RenderQueue::new(store.clone(), Arc::new(ManifestRenderer::new(dir)));
                for clip in &run.clips {
                    queue.submit(&video_id, clip, Some(&transcript.words));
                }
                queue.wait_all().await;

                for job in queue.store().list() {
                    if let JobStatus::Failed(reason) = &job.status {
                        warn!("[RENDER] Clip {} not handed off: {}", job.clip_id, reason);
                    }
                }
            }

            write_clips(&run.clips, output.as_deref())?;
        }
        Commands::Windows { words } => {
            let transcript = load_transcript(&words)?;
            for window in split_windows(&transcript.words, &config.finder) {
                println!(
                    "#{:<3} offset {:>8.2}s  words {:>6}..{:<6}  {} chars",
                    window.index,
                    window.offset,
                    window.words.start,
                    window.words.end,
                    window.text.len()
                );
            }
        }
    }

    Ok(())
}

/// Explicit segment file wins over segments embedded in the transcript.
fn resolve_hints(
    path: Option<&Path>,
    embedded: Vec<TranscriptSegment>,
) -> Result<Option<Vec<TranscriptSegment>>> {
    if let Some(path) = path {
        return Ok(Some(load_segments(path)?));
    }
    Ok((!embedded.is_empty()).then_some(embedded))
}

fn write_clips(clips: &[ClipSuggestion], output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(clips)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("[SYNOID] Wrote {} clips to {:?}", clips.len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
