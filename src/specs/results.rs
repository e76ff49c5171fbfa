// src/specs/results.rs
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::config::consts::{DEFAULT_STARTING_SCORE, NOT_RANKED};
use crate::score::Points;

/// Seat order in the first round ("Starting position in first round").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StartingPosition {
    First,
    Second,
    Third,
    Fourth,
}

impl StartingPosition {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "First player" => Some(StartingPosition::First),
            "Second player" => Some(StartingPosition::Second),
            "Third player" => Some(StartingPosition::Third),
            "Fourth player" => Some(StartingPosition::Fourth),
            _ => None,
        }
    }

    /// Score offset before any appeal or conservation is counted.
    pub fn starting_score(self) -> Points {
        match self {
            StartingPosition::First => -14,
            StartingPosition::Second => -13,
            StartingPosition::Third => -12,
            StartingPosition::Fourth => -11,
        }
    }
}

/// Missing or unknown labels start at the first player's offset.
pub fn starting_score_for(label: Option<&str>) -> Points {
    label
        .and_then(StartingPosition::parse)
        .map(StartingPosition::starting_score)
        .unwrap_or(DEFAULT_STARTING_SCORE)
}

/// A parsed "Game result" cell, e.g. `"1st (142)"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub place: u8,
    pub score: Points,
}

fn score_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((-?\d+)\)").expect("result pattern compiles"))
}

pub fn is_not_ranked(value: &str) -> bool {
    value.contains(NOT_RANKED)
}

/// None for "not ranked" rows and anything without a leading place 1-4 and a
/// parenthesized score.
pub fn parse_game_result(value: &str) -> Option<GameResult> {
    if is_not_ranked(value) {
        return None;
    }
    // Leading digit 1-4, suffix optional
    let place = value
        .trim_start()
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .filter(|d| (1..=4).contains(d))? as u8;

    let caps = score_pattern().captures(value)?;
    let score = caps.get(1)?.as_str().parse::<Points>().ok()?;

    Some(GameResult { place, score })
}
