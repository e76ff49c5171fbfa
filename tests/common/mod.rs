// tests/common/mod.rs
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use ark_stats::data::Dataset;
use ark_stats::players::TrackedPlayers;
use ark_stats::store::{parse_games, parse_logs};

pub fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("ark_stats_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn stats(position: [&str; 4], result: [&str; 4]) -> String {
    let players = ["msiebert", "marksbrt", "AstroHood", "siebert23"];
    let per = |vals: [&str; 4]| {
        players
            .iter()
            .zip(vals)
            .map(|(p, v)| format!("\"{p}\": \"{v}\""))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        r#"{{ "Map": {{ {} }}, "Starting position in first round": {{ {} }}, "Game result": {{ {} }} }}"#,
        per(["Map 2"; 4]),
        per(position),
        per(result)
    )
}

/// 100: analysed, one mismatch (siebert23 computed −10, recorded −8)
/// 101: three players, filtered out
/// 102: valid but has no log
/// 103: has "not ranked", filtered out
pub fn games_json() -> String {
    let positions = ["First player", "Second player", "Third player", "Fourth player"];
    format!(
        r#"{{
  "exportedAt": "2025-01-01T00:00:00.000Z",
  "totalGames": 4,
  "games": [
    {{ "tableId": "100", "players": ["msiebert", "marksbrt", "AstroHood", "siebert23"],
       "stats": {}, "date": "2025-02-01", "url": "https://example.test/table?table=100" }},
    {{ "tableId": "101", "players": ["msiebert", "marksbrt", "AstroHood"],
       "stats": {{ "Map": {{ "msiebert": "Map 1" }} }} }},
    {{ "tableId": "102", "players": ["msiebert", "marksbrt", "AstroHood", "siebert23"],
       "stats": {} }},
    {{ "tableId": "103", "players": ["msiebert", "marksbrt", "AstroHood", "siebert23"],
       "stats": {} }}
  ]
}}"#,
        stats(positions, ["1st (14)", "2nd (-10)", "3rd (-12)", "4th (-8)"]),
        stats(positions, ["1st (50)", "2nd (40)", "3rd (30)", "4th (20)"]),
        stats(positions, ["1st (not ranked)", "2nd (40)", "3rd (30)", "4th (20)"]),
    )
}

pub const LOGS_JSON: &str = r#"{
  "exportedAt": "2025-01-01T00:00:00.000Z",
  "logs": [
    { "tableId": "100", "url": "https://example.test/log?table=100", "moveCount": 4,
      "logEntries": [
        { "moveNumber": 1, "actions": [
            "msiebert chooses action card Animals with strength 4",
            "msiebert plays Lion",
            "msiebert gains 5 appeal",
            "stranger gains 40 appeal"
        ] },
        { "moveNumber": 2, "actions": [
            "marksbrt chooses action card Cards with strength 1",
            "marksbrt gains 3 appeal"
        ] },
        { "moveNumber": 3, "actions": [
            "msiebert chooses action card Association with strength 5",
            "msiebert gains 11 conservation point(s)"
        ] },
        { "moveNumber": 4, "actions": [
            "siebert23 chooses action card Build with strength 2",
            "siebert23 gains 2 appeal",
            "siebert23 has to discard and loses 1 appeal",
            "siebert23 gains 4 appeal as income",
            "siebert23 loses 4 appeal"
        ] }
      ] },
    { "tableId": "999", "logEntries": [
        { "moveNumber": 1, "actions": [
            "AstroHood chooses action card Sponsors with strength 3",
            "AstroHood gains 25 appeal",
            "AstroHood pouches 1 card(s) for 4 appeal",
            "AstroHood donates 2 money to get 2 conservation"
        ] },
        { "moveNumber": 2, "actions": [ "marksbrt gains 1 appeal" ] }
      ] },
    { "tableId": "500", "logEntries": [
        { "moveNumber": 1, "actions": [
            "msiebert chooses action card Animals with strength 2",
            "msiebert gains 30 conservation"
        ] }
      ] }
  ]
}"#;

pub fn dataset() -> Dataset {
    let games = parse_games(&games_json()).unwrap();
    let logs = parse_logs(LOGS_JSON).unwrap();
    Dataset::from_documents(games, logs, &TrackedPlayers::default())
}
