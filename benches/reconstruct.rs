// benches/reconstruct.rs
use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use ark_stats::players::TrackedPlayers;
use ark_stats::score::accumulator::reconstruct_log;
use ark_stats::score::turns::score_turns;
use ark_stats::store::{GameLog, MoveLogEntry};

const PLAYERS: [&str; 4] = ["msiebert", "marksbrt", "AstroHood", "siebert23"];

/// A plausible game: ~200 moves, a turn marker and a handful of lines per move.
fn synthetic_log() -> GameLog {
    let cards = ["Animals", "Cards", "Build", "Association", "Sponsors"];
    let log_entries = (1..=200u32)
        .map(|m| {
            let p = PLAYERS[(m as usize) % 4];
            let actions = vec![
                format!("{p} chooses action card {} with strength {}", cards[(m as usize) % 5], m % 5 + 1),
                format!("{p} plays a card"),
                format!("{p} gains {} appeal", m % 4),
                format!("{p} gains {} conservation point(s)", m % 2),
                format!("{p} pouches 1 card(s) for {} appeal", m % 3),
                format!("{p} gains 5 money"),
                format!("{p} has to discard and loses {} appeal", m % 2),
            ];
            MoveLogEntry { move_number: m, actions }
        })
        .collect();
    GameLog { table_id: "bench".into(), log_entries, ..Default::default() }
}

fn bench_reconstruct(c: &mut Criterion) {
    let log = synthetic_log();
    let tracked = TrackedPlayers::default();
    let starting: BTreeMap<String, i64> = PLAYERS.iter().map(|p| (p.to_string(), -14)).collect();

    c.bench_function("reconstruct_log", |b| {
        b.iter(|| {
            let r = reconstruct_log("bench", &starting, black_box(&log.log_entries), &tracked);
            black_box(r.max_move_number)
        })
    });

    c.bench_function("score_turns", |b| {
        b.iter(|| {
            let turns = score_turns(black_box(&log), None, &tracked);
            black_box(turns.len())
        })
    });
}

criterion_group!(benches, bench_reconstruct);
criterion_main!(benches);
