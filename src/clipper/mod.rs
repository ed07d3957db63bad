// SYNOID Clipper Module
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Short-form clip extraction: candidate finding over transcript windows and
// boundary refinement onto word-level timestamps.

pub mod candidate;
pub mod captions;
pub mod clip;
pub mod error;
pub mod finder;
pub mod generator;
pub mod locator;
pub mod refiner;
pub mod transcript;

pub use candidate::{rank_candidates, scale_score, Candidate, GeneratedSpan};
pub use clip::{ClipSegment, ClipSuggestion, SegmentType};
pub use error::RefineError;
pub use finder::{split_windows, CandidateFinder, TranscriptWindow};
pub use generator::{LlmSpanGenerator, SpanGenerator};
pub use locator::{FuzzyPhraseLocator, PhraseLocator};
pub use refiner::{AcceptedRange, BoundaryRefiner};
pub use transcript::{TranscriptBundle, TranscriptSegment, WordTimestamp};
