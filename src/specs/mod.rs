// src/specs/mod.rs
//! # Log-text "specs" module
//!
//! This module hosts the **text grammars** the rest of the crate relies on. Each grammar
//! knows how one family of strings is phrased on the game site and how to pull
//! typed values out of it.
//!
//! ## What lives here
//! - **Scoring-event classification** for move-log lines (`events`): appeal gained,
//!   lost or earned by pouching; conservation gained outright or bought by donation.
//! - **Turn markers** (`turns`): the "chooses action card" line that opens a turn.
//! - **Stat-table values** (`results`): starting position labels and the
//!   `"1st (142)"` game result strings.
//!
//! ## What does **not** live here
//! - **Score arithmetic** (tiers, running totals, turn sums): that is `score`.
//! - **Document loading / merging**: that is `store`.
//! - **Filtering to tracked players** beyond the single `extract` entry point.
//!
//! ## Conventions & invariants
//! - Pure functions of the input text. No state, no I/O.
//! - Lines are whitespace-normalized before matching (`core::sanitize::normalize_ws`).
//! - Anything unrecognized yields `None`. Logs are noisy and the grammar is
//!   incomplete by nature, so nothing here returns an error.
//! - A line that matches a kind but carries an unusable number is **dropped**, not
//!   handed to a lower-precedence kind.
//!
//! ## Testing notes
//! - Every pattern is tested against phrasing copied from real game logs,
//!   including the near-misses that must not match.
pub mod events;
pub mod results;
pub mod turns;
