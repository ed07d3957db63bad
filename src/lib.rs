// SYNOID Clipper Library
// Copyright (c) 2026 Xing_The_Creator | SYNOID

pub mod clipper;
pub mod config;
pub mod pipeline;
pub mod render;
