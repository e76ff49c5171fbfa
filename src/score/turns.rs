// src/score/turns.rs
//
// Biggest single turns.
//
// A turn opens at a "chooses action card" line and runs until the next one (or
// the end of the log). Scoring is two passes:
//   1. a global ledger of each player's running conservation total, by stream index
//   2. per turn, the acting player's appeal plus the conservation points their
//      gain was worth given the total they had before the turn started
// Only plain appeal gains (not income) and plain conservation gains count toward
// a turn. Pouch appeal and donations stay out of turn totals; donations still
// feed the ledger so the tier reflects the player's real running total.

use std::collections::HashMap;

use serde::Serialize;

use crate::players::TrackedPlayers;
use crate::specs::events::{self, EventKind, ScoringEvent};
use crate::specs::turns::{TurnMarker, looks_like_appeal_gain, parse_marker};
use crate::store::{GameLog, GameRecord, MoveLogEntry};

use super::Points;
use super::accumulator::in_move_order;
use super::tiers::points_for_gain;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatAction<'a> {
    pub index: usize,
    pub move_number: u32,
    pub text: &'a str,
}

pub fn flatten(entries: &[MoveLogEntry]) -> Vec<FlatAction<'_>> {
    in_move_order(entries)
        .into_iter()
        .flat_map(|e| e.actions.iter().map(move |a| (e.move_number, a.as_str())))
        .enumerate()
        .map(|(index, (move_number, text))| FlatAction { index, move_number, text })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnBoundary {
    pub index: usize,
    pub move_number: u32,
    pub marker: TurnMarker,
}

/// A turn's extent is `[boundary.index, end_index)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnSpan {
    pub boundary: TurnBoundary,
    pub end_index: usize,
    pub end_move: u32,
}

/// `last_move` closes the final turn; it is the log's highest move number.
pub fn segment(stream: &[FlatAction<'_>], last_move: u32) -> Vec<TurnSpan> {
    let boundaries: Vec<TurnBoundary> = stream
        .iter()
        .filter_map(|a| {
            parse_marker(a.text).map(|marker| TurnBoundary { index: a.index, move_number: a.move_number, marker })
        })
        .collect();

    let mut spans = Vec::with_capacity(boundaries.len());
    for (i, b) in boundaries.iter().enumerate() {
        // A turn followed by another in the same move ends one move before it started
        let (end_index, end_move) = match boundaries.get(i + 1) {
            Some(next) => (next.index, next.move_number.saturating_sub(1)),
            None => (stream.len(), last_move),
        };
        spans.push(TurnSpan { boundary: b.clone(), end_index, end_move });
    }
    spans
}

/// Pass 1: per player, (stream index, conservation total after that event).
#[derive(Clone, Debug, Default)]
pub struct ConservationLedger {
    totals: HashMap<String, Vec<(usize, u32)>>,
}

impl ConservationLedger {
    pub fn build(events: &[(usize, ScoringEvent)]) -> Self {
        let mut totals: HashMap<String, Vec<(usize, u32)>> = HashMap::new();
        for (index, ev) in events.iter().filter(|(_, ev)| ev.kind.is_conservation()) {
            let series = totals.entry(ev.player.clone()).or_default();
            let before = series.last().map_or(0, |&(_, t)| t);
            series.push((*index, before.saturating_add(ev.magnitude)));
        }
        Self { totals }
    }

    /// Total strictly before stream index `index`.
    pub fn total_before(&self, player: &str, index: usize) -> u32 {
        let Some(series) = self.totals.get(player) else { return 0 };
        match series.partition_point(|&(i, _)| i < index) {
            0 => 0,
            n => series[n - 1].1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnScore {
    pub table_id: String,
    pub player: String,
    pub card: String,
    pub strength: u32,
    pub start_move: u32,
    pub end_move: u32,
    pub appeal: Points,
    pub conservation_points: Points,
    pub total: Points,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Turns with a positive total by a tracked player, in log order.
/// Empty for logs that are not Ark Nova logs.
pub fn score_turns(log: &GameLog, game: Option<&GameRecord>, tracked: &TrackedPlayers) -> Vec<TurnScore> {
    let stream = flatten(&log.log_entries);
    if !stream.iter().any(|a| looks_like_appeal_gain(a.text)) {
        log::debug!("table {}: no appeal lines, not scoring turns", log.table_id);
        return Vec::new();
    }

    let events: Vec<(usize, ScoringEvent)> = stream
        .iter()
        .filter_map(|a| events::extract(a.text, a.move_number, tracked).map(|ev| (a.index, ev)))
        .collect();
    let ledger = ConservationLedger::build(&events);
    let last_move = log.log_entries.iter().map(|e| e.move_number).max().unwrap_or(0);

    let date = game.and_then(|g| g.date.clone());
    let url = game.and_then(|g| g.url.clone()).or_else(|| log.url.clone());

    let mut out = Vec::new();
    for span in segment(&stream, last_move) {
        let TurnSpan { boundary, end_index, end_move } = span;
        let player = boundary.marker.player.as_str();
        if !tracked.contains(player) {
            continue;
        }

        // `events` is sorted by index, so the extent is a contiguous slice
        let lo = events.partition_point(|(i, _)| *i < boundary.index);
        let hi = events.partition_point(|(i, _)| *i < end_index);

        let mut appeal: Points = 0;
        let mut gained: u32 = 0;
        for (_, ev) in events[lo..hi].iter().filter(|(_, ev)| ev.player == player) {
            match ev.kind {
                EventKind::AppealGain if !ev.income => appeal += Points::from(ev.magnitude),
                EventKind::ConservationGain => gained = gained.saturating_add(ev.magnitude),
                _ => {}
            }
        }

        let conservation_points = points_for_gain(ledger.total_before(player, boundary.index), gained);
        let total = appeal + conservation_points;
        if total <= 0 {
            continue;
        }
        out.push(TurnScore {
            table_id: log.table_id.clone(),
            player: boundary.marker.player,
            card: boundary.marker.card,
            strength: boundary.marker.strength,
            start_move: boundary.move_number,
            end_move,
            appeal,
            conservation_points,
            total,
            date: date.clone(),
            url: url.clone(),
        });
    }
    out
}

/// Highest total first. Stable: equal totals keep their incoming order.
pub fn rank(mut turns: Vec<TurnScore>) -> Vec<TurnScore> {
    turns.sort_by(|a, b| b.total.cmp(&a.total));
    turns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(move_number: u32, actions: &[&str]) -> MoveLogEntry {
        MoveLogEntry { move_number, actions: actions.iter().map(|s| s.to_string()).collect() }
    }

    fn log(entries: Vec<MoveLogEntry>) -> GameLog {
        GameLog { table_id: "42".into(), log_entries: entries, ..Default::default() }
    }

    #[test]
    fn extents_and_end_moves() {
        let entries = vec![
            entry(4, &["setup", "msiebert gains 1 appeal", "filler"]),
            entry(5, &["msiebert chooses action card Animals with strength 3", "a", "b", "c", "d", "e"]),
            entry(8, &["marksbrt chooses action card Build with strength 2", "x"]),
            entry(9, &["y"]),
        ];
        let stream = flatten(&entries);
        let spans = segment(&stream, 9);
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].boundary.index, spans[0].end_index, spans[0].end_move), (3, 9, 7));
        assert_eq!((spans[1].boundary.index, spans[1].end_index, spans[1].end_move), (9, 12, 9));
    }

    #[test]
    fn same_move_turns_end_the_move_before() {
        let entries = vec![
            entry(
                5,
                &[
                    "msiebert chooses action card Cards with strength 1",
                    "marksbrt chooses action card Cards with strength 1",
                ],
            ),
            entry(7, &["AstroHood chooses action card Build with strength 2"]),
        ];
        let spans = segment(&flatten(&entries), 7);
        assert_eq!(spans[0].end_move, 4);
        assert_eq!(spans[1].end_move, 6);
        assert_eq!(spans[2].end_move, 7);
    }

    #[test]
    fn income_is_not_part_of_the_turn() {
        let l = log(vec![
            entry(1, &["msiebert chooses action card Animals with strength 4", "msiebert gains 5 appeal"]),
            entry(2, &["msiebert gains 3 appeal as income"]),
        ]);
        let turns = score_turns(&l, None, &TrackedPlayers::default());
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].appeal, 5);
        assert_eq!(turns[0].total, 5);
        assert_eq!((turns[0].start_move, turns[0].end_move), (1, 2));
    }

    #[test]
    fn tier_uses_conservation_from_earlier_turns() {
        let l = log(vec![
            entry(1, &["msiebert chooses action card Sponsors with strength 2", "msiebert gains 9 conservation"]),
            entry(
                2,
                &[
                    "marksbrt chooses action card Animals with strength 1",
                    "marksbrt gains 1 appeal",
                    "msiebert donates 2 money to get 1 conservation",
                ],
            ),
            entry(3, &["msiebert chooses action card Association with strength 5", "msiebert gains 2 conservation"]),
        ]);
        let turns = score_turns(&l, None, &TrackedPlayers::default());
        let third = turns.iter().find(|t| t.card == "Association").unwrap();
        // donation lifts the total to 10, so 10 → 12 is worth 3 each
        assert_eq!(third.conservation_points, 6);
        assert_eq!(turns[0].conservation_points, 18);
    }

    #[test]
    fn pouch_and_donation_stay_out_of_the_turn() {
        let l = log(vec![entry(
            1,
            &[
                "msiebert chooses action card Sponsors with strength 3",
                "msiebert gains 1 appeal",
                "msiebert pouches 1 card(s) for 4 appeal",
                "msiebert donates 2 money to get 2 conservation",
            ],
        )]);
        let turns = score_turns(&l, None, &TrackedPlayers::default());
        assert_eq!(turns.len(), 1);
        assert_eq!((turns[0].appeal, turns[0].conservation_points, turns[0].total), (1, 0, 1));
    }

    #[test]
    fn other_players_events_in_a_turn_do_not_count() {
        let l = log(vec![entry(
            1,
            &[
                "AstroHood chooses action card Animals with strength 3",
                "siebert23 gains 4 appeal",
                "AstroHood gains 1 appeal",
            ],
        )]);
        let turns = score_turns(&l, None, &TrackedPlayers::default());
        assert_eq!(turns[0].total, 1);
    }

    #[test]
    fn drops_empty_and_untracked_turns() {
        let l = log(vec![
            entry(1, &["stranger chooses action card Animals with strength 3", "stranger gains 9 appeal"]),
            entry(2, &["msiebert chooses action card Cards with strength 1", "msiebert loses 1 appeal"]),
            entry(3, &["marksbrt chooses action card Animals with strength 2", "marksbrt gains 2 appeal"]),
        ]);
        let turns = score_turns(&l, None, &TrackedPlayers::default());
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].player, "marksbrt");
    }

    #[test]
    fn non_ark_nova_logs_are_skipped() {
        let l = log(vec![entry(1, &["msiebert chooses action card Animals with strength 3", "msiebert gains 2 conservation"])]);
        assert!(score_turns(&l, None, &TrackedPlayers::default()).is_empty());
    }

    #[test]
    fn game_record_supplies_date_and_url() {
        let l = log(vec![entry(1, &["msiebert chooses action card Animals with strength 3", "msiebert gains 2 appeal"])]);
        let game = GameRecord {
            table_id: "42".into(),
            date: Some("2025-03-01".into()),
            url: Some("https://example.test/42".into()),
            ..Default::default()
        };
        let turns = score_turns(&l, Some(&game), &TrackedPlayers::default());
        assert_eq!(turns[0].date.as_deref(), Some("2025-03-01"));
        assert_eq!(turns[0].url.as_deref(), Some("https://example.test/42"));
    }

    #[test]
    fn ranking_is_stable() {
        let t = |card: &str, total: Points| TurnScore {
            table_id: "1".into(),
            player: "msiebert".into(),
            card: card.into(),
            strength: 1,
            start_move: 1,
            end_move: 1,
            appeal: total,
            conservation_points: 0,
            total,
            date: None,
            url: None,
        };
        let ranked = rank(vec![t("a", 3), t("b", 9), t("c", 3), t("d", 9)]);
        let order: Vec<&str> = ranked.iter().map(|t| t.card.as_str()).collect();
        assert_eq!(order, ["b", "d", "a", "c"]);
    }

    #[test]
    fn ledger_lookup_is_strictly_before() {
        let tracked = TrackedPlayers::default();
        let evs: Vec<(usize, ScoringEvent)> = [(2, "msiebert gains 3 conservation"), (6, "msiebert gains 4 conservation")]
            .into_iter()
            .filter_map(|(i, l)| events::extract(l, 1, &tracked).map(|e| (i, e)))
            .collect();
        let ledger = ConservationLedger::build(&evs);
        assert_eq!(ledger.total_before("msiebert", 2), 0);
        assert_eq!(ledger.total_before("msiebert", 3), 3);
        assert_eq!(ledger.total_before("msiebert", 6), 3);
        assert_eq!(ledger.total_before("msiebert", 7), 7);
        assert_eq!(ledger.total_before("marksbrt", 7), 0);
    }
}
