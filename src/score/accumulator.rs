// src/score/accumulator.rs
use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::consts::{DEFAULT_STARTING_SCORE, STAT_STARTING_POSITION};
use crate::players::TrackedPlayers;
use crate::specs::events::{self, EventKind, ScoringEvent};
use crate::specs::results::starting_score_for;
use crate::store::{GameLog, GameRecord, MoveLogEntry};

use super::Points;
use super::tiers::points_for_gain;

/// One step of a player's running score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePoint {
    pub move_number: u32,
    pub score: Points,
    pub kind: EventKind,
    /// Change produced by the event (negative for appeal loss).
    pub delta: Points,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerScoreState {
    pub starting_score: Points,
    pub raw_conservation: u32,
    pub history: Vec<ScorePoint>,
}

impl PlayerScoreState {
    pub fn new(starting_score: Points) -> Self {
        Self { starting_score, raw_conservation: 0, history: Vec::new() }
    }

    pub fn current(&self) -> Points {
        self.history.last().map_or(self.starting_score, |p| p.score)
    }

    pub fn apply(&mut self, ev: &ScoringEvent) {
        let m = Points::from(ev.magnitude);
        let delta = match ev.kind {
            EventKind::AppealGain | EventKind::AppealPouch => m,
            EventKind::AppealLoss => -m,
            EventKind::ConservationGain | EventKind::ConservationDonation => {
                let d = points_for_gain(self.raw_conservation, ev.magnitude);
                self.raw_conservation = self.raw_conservation.saturating_add(ev.magnitude);
                d
            }
        };
        let score = self.current() + delta;
        self.history.push(ScorePoint { move_number: ev.move_number, score, kind: ev.kind, delta });
    }
}

/// Result of reconstructing one game. Plain data; maps are keyed by player id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameScoreResult {
    pub table_id: String,
    pub starting_scores: BTreeMap<String, Points>,
    pub per_player_history: BTreeMap<String, Vec<ScorePoint>>,
    pub per_player_final_score: BTreeMap<String, Points>,
    pub raw_conservation: BTreeMap<String, u32>,
    pub max_move_number: u32,
}

impl GameScoreResult {
    pub fn final_score(&self, player: &str) -> Option<Points> {
        self.per_player_final_score.get(player).copied()
    }

    /// Plot-ready (move, score) pairs, starting with the implicit (0, starting score).
    pub fn series(&self, player: &str) -> Vec<(u32, Points)> {
        let Some(&start) = self.starting_scores.get(player) else {
            return Vec::new();
        };
        std::iter::once((0, start))
            .chain(
                self.per_player_history
                    .get(player)
                    .into_iter()
                    .flatten()
                    .map(|p| (p.move_number, p.score)),
            )
            .collect()
    }
}

/// Fold state for one game. Lives only inside a single reconstruction call.
#[derive(Clone, Debug, Default)]
pub struct ScoreAccumulator {
    players: BTreeMap<String, PlayerScoreState>,
    max_move_number: u32,
}

impl ScoreAccumulator {
    pub fn new(starting_scores: &BTreeMap<String, Points>) -> Self {
        let players = starting_scores
            .iter()
            .map(|(p, &s)| (p.clone(), PlayerScoreState::new(s)))
            .collect();
        Self { players, max_move_number: 0 }
    }

    pub fn observe_move(&mut self, move_number: u32) {
        self.max_move_number = self.max_move_number.max(move_number);
    }

    pub fn step(mut self, ev: ScoringEvent) -> Self {
        self.players
            .entry(ev.player.clone())
            .or_insert_with(|| PlayerScoreState::new(DEFAULT_STARTING_SCORE))
            .apply(&ev);
        self
    }

    pub fn state(&self, player: &str) -> Option<&PlayerScoreState> {
        self.players.get(player)
    }

    pub fn finish(self, table_id: &str) -> GameScoreResult {
        let mut out = GameScoreResult {
            table_id: table_id.to_string(),
            max_move_number: self.max_move_number,
            ..Default::default()
        };
        for (player, state) in self.players {
            out.starting_scores.insert(player.clone(), state.starting_score);
            out.per_player_final_score.insert(player.clone(), state.current());
            out.raw_conservation.insert(player.clone(), state.raw_conservation);
            out.per_player_history.insert(player, state.history);
        }
        out
    }
}

/// Starting offsets for the tracked players seated in `game`.
pub fn starting_scores(game: &GameRecord, tracked: &TrackedPlayers) -> BTreeMap<String, Points> {
    game.players
        .iter()
        .filter(|p| tracked.contains(p))
        .map(|p| (p.clone(), starting_score_for(game.stat(STAT_STARTING_POSITION, p))))
        .collect()
}

/// Entries in move order; lines keep their order within a move.
pub(crate) fn in_move_order(entries: &[MoveLogEntry]) -> Vec<&MoveLogEntry> {
    let mut ordered: Vec<&MoveLogEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.move_number);
    ordered
}

pub fn reconstruct_log(
    table_id: &str,
    starting: &BTreeMap<String, Points>,
    entries: &[MoveLogEntry],
    tracked: &TrackedPlayers,
) -> GameScoreResult {
    in_move_order(entries)
        .into_iter()
        .fold(ScoreAccumulator::new(starting), |mut acc, entry| {
            acc.observe_move(entry.move_number);
            entry
                .actions
                .iter()
                .filter_map(|line| events::extract(line, entry.move_number, tracked))
                .fold(acc, ScoreAccumulator::step)
        })
        .finish(table_id)
}

pub fn reconstruct(game: &GameRecord, log: &GameLog, tracked: &TrackedPlayers) -> GameScoreResult {
    let result = reconstruct_log(&game.table_id, &starting_scores(game, tracked), &log.log_entries, tracked);
    log::debug!(
        "table {}: {} moves, {} scoring events",
        game.table_id,
        result.max_move_number,
        result.per_player_history.values().map(Vec::len).sum::<usize>()
    );
    result
}
