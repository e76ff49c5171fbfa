// src/specs/events.rs
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::core::sanitize::normalize_ws;
use crate::players::TrackedPlayers;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AppealGain,
    AppealLoss,
    AppealPouch,
    ConservationGain,
    ConservationDonation,
}

impl EventKind {
    pub fn is_conservation(self) -> bool {
        matches!(self, EventKind::ConservationGain | EventKind::ConservationDonation)
    }

    pub fn label(self) -> &'static str {
        match self {
            EventKind::AppealGain => "appeal",
            EventKind::AppealLoss => "appeal_loss",
            EventKind::AppealPouch => "pouch",
            EventKind::ConservationGain => "conservation",
            EventKind::ConservationDonation => "donation",
        }
    }
}

/// A classified line, before the tracked-player filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified {
    pub player: String,
    pub kind: EventKind,
    pub magnitude: u32,
    /// The line mentions income (passive appeal at the break, not a chosen action).
    pub income: bool,
}

/// A scoring event for a tracked player, stamped with its move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoringEvent {
    pub player: String,
    pub move_number: u32,
    pub kind: EventKind,
    pub magnitude: u32,
    pub income: bool,
}

struct Rule {
    kind: EventKind,
    pattern: &'static str,
    /// Capture group holding the magnitude. Group 1 is always the player.
    magnitude_group: usize,
}

/// Checked top to bottom; the first pattern that matches owns the line.
///
/// 1. Pouch before appeal gain, donation before conservation gain: the specific
///    phrasing is checked before the generic "gains N …" form.
/// 2. Appeal gain / conservation gain: anchored "<player> gains N appeal|conservation".
/// 3. Appeal loss last. It allows any text between the name and "loses N appeal"
///    (reason clauses vary), so it must not see lines a stricter kind can claim.
const RULES: [Rule; 5] = [
    Rule {
        kind: EventKind::AppealPouch,
        pattern: r"^(\w+) pouches (\d+) card\(s\) for (\d+) appeal",
        magnitude_group: 3,
    },
    Rule {
        kind: EventKind::ConservationDonation,
        pattern: r"^(\w+) donates (?:\d+ money|for free) to get (\d+) conservation",
        magnitude_group: 2,
    },
    Rule {
        kind: EventKind::AppealGain,
        pattern: r"^(\w+) gains (\d+) appeal",
        magnitude_group: 2,
    },
    Rule {
        kind: EventKind::ConservationGain,
        pattern: r"^(\w+) gains (\d+) conservation",
        magnitude_group: 2,
    },
    Rule {
        kind: EventKind::AppealLoss,
        pattern: r"^(\w+)\b.*\bloses (\d+) appeal",
        magnitude_group: 2,
    },
];

fn compiled() -> &'static [Regex; 5] {
    static COMPILED: OnceLock<[Regex; 5]> = OnceLock::new();
    COMPILED.get_or_init(|| RULES.map(|rule| Regex::new(rule.pattern).expect("event pattern compiles")))
}

fn magnitude(caps: &Captures, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse::<u32>().ok()
}

fn mentions_income(line: &str) -> bool {
    line.to_ascii_lowercase().contains("income")
}

/// Classify one action line. Pure: same text, same answer.
pub fn classify(line: &str) -> Option<Classified> {
    let line = normalize_ws(line);
    for (rule, re) in RULES.iter().zip(compiled().iter()) {
        let Some(caps) = re.captures(&line) else { continue };

        let player = caps.get(1)?.as_str().to_string();
        let Some(magnitude) = magnitude(&caps, rule.magnitude_group) else {
            log::debug!("dropping {:?} line with unusable number: {line}", rule.kind);
            return None;
        };
        return Some(Classified {
            player,
            kind: rule.kind,
            magnitude,
            income: mentions_income(&line),
        });
    }
    None
}

/// Classify and keep the event only if it belongs to a tracked player.
pub fn extract(line: &str, move_number: u32, tracked: &TrackedPlayers) -> Option<ScoringEvent> {
    let c = classify(line)?;
    if !tracked.contains(&c.player) {
        return None;
    }
    Some(ScoringEvent {
        player: c.player,
        move_number,
        kind: c.kind,
        magnitude: c.magnitude,
        income: c.income,
    })
}
