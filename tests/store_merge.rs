// tests/store_merge.rs
mod common;

use std::fs;

use ark_stats::data::Dataset;
use ark_stats::players::TrackedPlayers;
use ark_stats::store::{load_games, load_logs, merge_games_file, merge_logs_file};

#[test]
fn merging_twice_adds_nothing_the_second_time() {
    let dir = common::tmp_dir("merge_games");
    let existing = dir.join("detailed_games.json");
    let new = dir.join("new_games.json");
    fs::write(&existing, common::games_json()).unwrap();

    let incoming = r#"{ "games": [
        { "tableId": "100", "players": [] },
        { "tableId": "200", "players": ["msiebert"], "duration": "61 mn" }
    ] }"#;
    fs::write(&new, incoming).unwrap();

    let first = merge_games_file(&existing, &new).unwrap();
    assert_eq!(first.added, ["200"]);
    assert_eq!(first.total, 5);

    // The consumed file is reset
    let reset: serde_json::Value = serde_json::from_str(&fs::read_to_string(&new).unwrap()).unwrap();
    assert_eq!(reset, serde_json::json!({ "games": [] }));

    fs::write(&new, incoming).unwrap();
    let second = merge_games_file(&existing, &new).unwrap();
    assert!(second.added.is_empty());
    assert_eq!(second.total, 5);
    // Nothing added, so the new file is left alone
    assert_eq!(fs::read_to_string(&new).unwrap(), incoming);

    let doc = load_games(&existing).unwrap();
    assert_eq!(doc.total_games, Some(5));
    assert_eq!(doc.games[4].extra.get("duration"), Some(&serde_json::Value::from("61 mn")));
}

#[test]
fn merged_logs_feed_the_dataset() {
    let dir = common::tmp_dir("merge_logs");
    let games = dir.join("games.json");
    let logs = dir.join("logs.json");
    let new = dir.join("new_logs.json");
    fs::write(&games, common::games_json()).unwrap();
    fs::write(&logs, common::LOGS_JSON).unwrap();
    fs::write(
        &new,
        r#"{ "logs": [ { "tableId": "102", "logEntries": [ { "moveNumber": 1, "actions": ["msiebert gains 2 appeal"] } ] } ] }"#,
    )
    .unwrap();

    let outcome = merge_logs_file(&logs, &new).unwrap();
    assert_eq!(outcome.added, ["102"]);
    assert_eq!(load_logs(&logs).unwrap().total_logs, Some(4));

    let options = ark_stats::config::options::DataOptions {
        games_path: games,
        logs_path: logs,
        log_file: dir.join("debug.log"),
    };
    let ds = Dataset::load(&options, &TrackedPlayers::default()).unwrap();
    assert!(ds.log_for("102").is_some());
}

#[test]
fn new_file_without_collection_counts_as_empty() {
    let dir = common::tmp_dir("merge_empty");
    let existing = dir.join("games.json");
    let new = dir.join("new.json");
    fs::write(&existing, common::games_json()).unwrap();
    fs::write(&new, "{}").unwrap();

    let outcome = merge_games_file(&existing, &new).unwrap();
    assert!(outcome.added.is_empty());
    assert_eq!(outcome.total, 4);
}

#[test]
fn main_document_without_collection_is_an_error() {
    let dir = common::tmp_dir("merge_missing");
    let existing = dir.join("games.json");
    let new = dir.join("new.json");
    fs::write(&existing, r#"{ "exportedAt": "x" }"#).unwrap();
    fs::write(&new, r#"{ "games": [] }"#).unwrap();
    assert!(merge_games_file(&existing, &new).is_err());
}
