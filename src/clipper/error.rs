// SYNOID Clip Refiner Errors
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use thiserror::Error;

/// Malformed core input. Per-candidate defects never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefineError {
    #[error("Word {index} is unusable: {reason}")]
    InvalidWord { index: usize, reason: String },

    #[error("Word {index} starts at {start:.3}s, before the previous word at {prev:.3}s")]
    OutOfOrder { index: usize, prev: f64, start: f64 },
}
