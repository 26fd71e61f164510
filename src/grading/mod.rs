// src/grading/mod.rs

pub mod banding;
pub mod scoring;

pub use banding::band;
pub use scoring::{MissRecord, ScoringResult, score};
