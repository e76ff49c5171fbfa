// src/runner.rs
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use serde::Serialize;

use crate::{
    config::consts::WORKERS,
    data::Dataset,
    error::{Error, Result},
    players::TrackedPlayers,
    progress::Progress,
    score::{
        accumulator::{self, GameScoreResult},
        reconcile::{self, Reconciliation},
        turns::{self, TurnScore},
    },
    store::{GameLog, GameRecord},
};

/// Everything the score commands need about one game.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnalysis {
    pub table_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub scores: GameScoreResult,
    pub reconciliation: Reconciliation,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresReport {
    pub games: Vec<GameAnalysis>,
    /// Table ids with no companion move log.
    pub skipped: Vec<String>,
}

pub fn analyse_game(game: &GameRecord, log: &GameLog, tracked: &TrackedPlayers) -> GameAnalysis {
    let scores = accumulator::reconstruct(game, log, tracked);
    let reconciliation = reconcile::reconcile(&scores, &reconcile::authoritative_scores(game), tracked);
    GameAnalysis {
        table_id: game.table_id.clone(),
        date: game.date.clone(),
        url: game.url.clone(),
        scores,
        reconciliation,
    }
}

/// Map `work` over `items` on a small pool of scoped threads.
/// Workers claim indices from a shared counter; results come back over a channel
/// and are put back in input order. `on_done` runs on the calling thread.
fn pool_map<T, R, F>(items: &[T], work: F, mut on_done: impl FnMut(&R)) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let counter = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, R)>();
    let workers = WORKERS.min(items.len()).max(1);
    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(items.len()).collect();

    thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let (counter, work) = (&counter, &work);
            s.spawn(move || {
                loop {
                    let i = counter.fetch_add(1, Ordering::Relaxed);
                    if i >= items.len() {
                        break;
                    }
                    if tx.send((i, work(&items[i]))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx); // main thread is sole receiver now

        for (i, result) in rx {
            on_done(&result);
            slots[i] = Some(result);
        }
    });

    slots.into_iter().flatten().collect()
}

enum Outcome {
    Analysed(GameAnalysis),
    NoLog(String),
}

/// Reconstruct and reconcile every valid game, or just `table` when given.
pub fn run_scores(
    dataset: &Dataset,
    tracked: &TrackedPlayers,
    table: Option<&str>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<ScoresReport> {
    let games: Vec<&GameRecord> = match table {
        Some(id) => vec![dataset.game(id).ok_or_else(|| Error::UnknownTable(id.to_string()))?],
        None => dataset.games().iter().collect(),
    };

    if let Some(p) = progress.as_deref_mut() {
        p.begin(games.len());
    }

    let outcomes = pool_map(
        &games,
        |game| match dataset.log_for(&game.table_id) {
            Some(log) => Outcome::Analysed(analyse_game(game, log, tracked)),
            None => Outcome::NoLog(game.table_id.clone()),
        },
        |outcome| {
            let Some(p) = progress.as_deref_mut() else { return };
            match outcome {
                Outcome::Analysed(a) => p.item_done(&a.table_id),
                Outcome::NoLog(id) => p.item_skipped(id, "no log"),
            }
        },
    );

    let mut report = ScoresReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Analysed(a) => {
                if !a.reconciliation.is_exact() {
                    log::debug!("table {}: {} score mismatch(es)", a.table_id, a.reconciliation.mismatches().count());
                }
                report.games.push(a);
            }
            Outcome::NoLog(id) => {
                log::info!("table {id}: skipped, no log");
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("table {id}: skipped, no log"));
                }
                report.skipped.push(id);
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    log::info!("Analysed {} games, skipped {}", report.games.len(), report.skipped.len());
    Ok(report)
}

/// Every scoring turn across all logs, biggest first.
pub fn run_turns(
    dataset: &Dataset,
    tracked: &TrackedPlayers,
    mut progress: Option<&mut dyn Progress>,
) -> Vec<TurnScore> {
    let logs = dataset.logs();
    if let Some(p) = progress.as_deref_mut() {
        p.begin(logs.len());
    }

    let per_log = pool_map(
        logs,
        |log| (log.table_id.clone(), turns::score_turns(log, dataset.game(&log.table_id), tracked)),
        |(table_id, turns)| {
            let Some(p) = progress.as_deref_mut() else { return };
            if turns.is_empty() {
                p.item_skipped(table_id, "no scoring turns");
            } else {
                p.item_done(table_id);
            }
        },
    );

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    let ranked = turns::rank(per_log.into_iter().flat_map(|(_, t)| t).collect());
    log::info!("Scored {} turns from {} logs", ranked.len(), logs.len());
    ranked
}
