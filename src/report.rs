// src/report.rs
//! Flatten analysis results into plain tables for CSV/TSV export.
//! Column 0 is always the table id; per-game export groups on it.

use crate::players::TrackedPlayers;
use crate::runner::GameAnalysis;
use crate::score::turns::TurnScore;

/// Headers + rows, the shape every delimited export takes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    fn with_headers(headers: &[&str]) -> Self {
        Self { headers: Some(headers.iter().map(|h| h.to_string()).collect()), rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub const GROUP_COLUMN: usize = 0;

const SCORE_HEADERS: [&str; 6] = ["Table", "Player", "Move", "Score", "Delta", "Kind"];
const RECONCILE_HEADERS: [&str; 6] = ["Table", "Player", "Computed", "Recorded", "Diff", "Status"];
const TURN_HEADERS: [&str; 12] = [
    "Rank", "Table", "Player", "Card", "Strength", "Start move", "End move", "Appeal", "Cons pts", "Total",
    "Date", "URL",
];

/// One row per score step, the implicit starting point included (move 0, empty kind).
/// Players follow tracked order and use display names.
pub fn score_rows(games: &[GameAnalysis], tracked: &TrackedPlayers) -> DataSet {
    let mut out = DataSet::with_headers(&SCORE_HEADERS);
    for game in games {
        let scores = &game.scores;
        for player in tracked.iter() {
            let Some(start) = scores.starting_scores.get(player) else { continue };
            let name = tracked.display_name(player);
            out.rows.push(vec![
                game.table_id.clone(),
                name.to_string(),
                "0".into(),
                start.to_string(),
                String::new(),
                String::new(),
            ]);
            for p in scores.per_player_history.get(player).into_iter().flatten() {
                out.rows.push(vec![
                    game.table_id.clone(),
                    name.to_string(),
                    p.move_number.to_string(),
                    p.score.to_string(),
                    format!("{:+}", p.delta),
                    p.kind.label().to_string(),
                ]);
            }
        }
    }
    out
}

pub fn reconciliation_rows(games: &[GameAnalysis], tracked: &TrackedPlayers) -> DataSet {
    let mut out = DataSet::with_headers(&RECONCILE_HEADERS);
    for game in games {
        for e in &game.reconciliation.entries {
            out.rows.push(vec![
                game.table_id.clone(),
                tracked.display_name(&e.player).to_string(),
                e.computed.to_string(),
                e.authoritative.to_string(),
                e.diff.to_string(),
                format!("{:?}", e.status).to_lowercase(),
            ]);
        }
    }
    out
}

/// Ranked turns, rank starting at 1. Table id moves to column 1 here, so this
/// set is never exported per game.
pub fn turn_rows(turns: &[TurnScore], tracked: &TrackedPlayers) -> DataSet {
    let mut out = DataSet::with_headers(&TURN_HEADERS);
    for (i, t) in turns.iter().enumerate() {
        out.rows.push(vec![
            (i + 1).to_string(),
            t.table_id.clone(),
            tracked.display_name(&t.player).to_string(),
            t.card.clone(),
            t.strength.to_string(),
            t.start_move.to_string(),
            t.end_move.to_string(),
            t.appeal.to_string(),
            t.conservation_points.to_string(),
            t.total.to_string(),
            t.date.clone().unwrap_or_default(),
            t.url.clone().unwrap_or_default(),
        ]);
    }
    out
}

/// `Matt (Animals, 4): 5 appeal + 8 cons = 13 [table 123, moves 10-11]`
pub fn turn_line(t: &TurnScore, tracked: &TrackedPlayers) -> String {
    let moves = if t.end_move <= t.start_move {
        format!("move {}", t.start_move)
    } else {
        format!("moves {}-{}", t.start_move, t.end_move)
    };
    format!(
        "{} ({}, {}): {} appeal + {} cons = {} [table {}, {}]",
        tracked.display_name(&t.player),
        t.card,
        t.strength,
        t.appeal,
        t.conservation_points,
        t.total,
        t.table_id,
        moves
    )
}
