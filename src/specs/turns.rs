// src/specs/turns.rs
use std::sync::OnceLock;

use regex::Regex;

use crate::core::sanitize::normalize_ws;

/// The line that opens a turn: `<player> chooses action card <card> with strength <N>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnMarker {
    pub player: String,
    pub card: String,
    pub strength: u32,
}

fn pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\w+) chooses action card (\w+) with strength (\d+)")
            .expect("turn pattern compiles")
    })
}

pub fn parse_marker(line: &str) -> Option<TurnMarker> {
    let line = normalize_ws(line);
    let caps = pattern().captures(&line)?;
    Some(TurnMarker {
        player: caps.get(1)?.as_str().to_string(),
        card: caps.get(2)?.as_str().to_string(),
        strength: caps.get(3)?.as_str().parse().ok()?,
    })
}

/// Rough game-type sniff: only Ark Nova logs have "<player> gains N appeal" lines.
pub fn looks_like_appeal_gain(line: &str) -> bool {
    line.contains("gains") && line.contains("appeal")
}
