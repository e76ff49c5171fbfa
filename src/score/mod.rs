// src/score/mod.rs
//! Score reconstruction from move logs.
//!
//! - `tiers`: raw conservation → victory points
//! - `accumulator`: per-game fold of scoring events into running scores
//! - `turns`: turn segmentation and the biggest-turn ranking
//! - `reconcile`: computed final score vs. the recorded result

pub mod accumulator;
pub mod reconcile;
pub mod tiers;
pub mod turns;

/// Victory points. Signed: scores start negative and appeal can be lost.
pub type Points = i64;
