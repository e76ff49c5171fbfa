// src/score/reconcile.rs
use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::consts::STAT_GAME_RESULT;
use crate::players::TrackedPlayers;
use crate::specs::results::parse_game_result;
use crate::store::GameRecord;

use super::Points;
use super::accumulator::GameScoreResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Match,
    Mismatch,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerReconciliation {
    pub player: String,
    pub computed: Points,
    pub authoritative: Points,
    /// computed − authoritative
    pub diff: Points,
    pub status: Status,
}

impl PlayerReconciliation {
    /// `Matt: 142`, or `Matt: 140 vs 142 (-2)` when the numbers disagree.
    pub fn display(&self, name: &str) -> String {
        match self.status {
            Status::Match => format!("{name}: {}", self.computed),
            Status::Mismatch => format!("{name}: {} vs {} ({:+})", self.computed, self.authoritative, self.diff),
        }
    }
}

/// Advisory only. Mismatches are expected for older logs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub table_id: String,
    pub entries: Vec<PlayerReconciliation>,
}

impl Reconciliation {
    pub fn is_exact(&self) -> bool {
        self.entries.iter().all(|e| e.status == Status::Match)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &PlayerReconciliation> {
        self.entries.iter().filter(|e| e.status == Status::Mismatch)
    }

    pub fn summary_line(&self, tracked: &TrackedPlayers) -> String {
        self.entries
            .iter()
            .map(|e| e.display(tracked.display_name(&e.player)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Recorded final scores by player. Unranked or unparseable cells are left out.
pub fn authoritative_scores(game: &GameRecord) -> BTreeMap<String, Points> {
    game.players
        .iter()
        .filter_map(|p| {
            let result = parse_game_result(game.stat(STAT_GAME_RESULT, p)?)?;
            Some((p.clone(), result.score))
        })
        .collect()
}

/// One entry per tracked player that has both a computed and a recorded score,
/// in tracked-player order.
pub fn reconcile(
    result: &GameScoreResult,
    authoritative: &BTreeMap<String, Points>,
    tracked: &TrackedPlayers,
) -> Reconciliation {
    let entries = tracked
        .iter()
        .filter_map(|player| {
            let computed = result.final_score(player)?;
            let authoritative = *authoritative.get(player)?;
            let diff = computed - authoritative;
            Some(PlayerReconciliation {
                player: player.to_string(),
                computed,
                authoritative,
                diff,
                status: if diff == 0 { Status::Match } else { Status::Mismatch },
            })
        })
        .collect();
    Reconciliation { table_id: result.table_id.clone(), entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::accumulator::reconstruct_log;
    use crate::store::MoveLogEntry;

    fn game() -> GameRecord {
        let mut g = GameRecord {
            table_id: "5".into(),
            players: vec!["msiebert".into(), "marksbrt".into()],
            ..Default::default()
        };
        g.stats.insert(
            STAT_GAME_RESULT.into(),
            [("msiebert", "1st (-4)"), ("marksbrt", "2nd (not ranked)")]
                .into_iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        );
        g
    }

    #[test]
    fn reads_recorded_scores() {
        let scores = authoritative_scores(&game());
        assert_eq!(scores.get("msiebert"), Some(&-4));
        assert!(!scores.contains_key("marksbrt"));
    }

    #[test]
    fn matching_stream_has_zero_diff() {
        let starting: BTreeMap<String, Points> = [("msiebert".to_string(), -14)].into_iter().collect();
        let log = [MoveLogEntry {
            move_number: 3,
            actions: vec!["msiebert gains 5 appeal".into(), "msiebert gains 5 appeal".into()],
        }];
        let tracked = TrackedPlayers::default();
        let result = reconstruct_log("5", &starting, &log, &tracked);
        let rec = reconcile(&result, &authoritative_scores(&game()), &tracked);
        assert_eq!(rec.entries.len(), 1);
        assert_eq!(rec.entries[0].diff, 0);
        assert!(rec.is_exact());
        assert_eq!(rec.summary_line(&tracked), "Matt: -4");
    }

    #[test]
    fn mismatch_is_signed_and_displayed() {
        let e = PlayerReconciliation {
            player: "marksbrt".into(),
            computed: 140,
            authoritative: 142,
            diff: -2,
            status: Status::Mismatch,
        };
        assert_eq!(e.display("Mark"), "Mark: 140 vs 142 (-2)");
        let over = PlayerReconciliation { computed: 145, diff: 3, ..e.clone() };
        assert_eq!(over.display("Mark"), "Mark: 145 vs 142 (+3)");

        let rec = Reconciliation { table_id: "1".into(), entries: vec![e, over] };
        assert!(!rec.is_exact());
        assert_eq!(rec.mismatches().count(), 2);
    }
}
