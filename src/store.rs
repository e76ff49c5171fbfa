// src/store.rs
//! On-disk documents: the games export (`{"games": [...]}`) and the move-log export
//! (`{"logs": [...]}`), plus merging freshly scraped records into them.
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// stat category → player → raw cell text
pub type Stats = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub table_id: String,
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Keys we don't model survive a load/merge/save cycle.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameRecord {
    pub fn stat(&self, category: &str, player: &str) -> Option<&str> {
        self.stats.get(category)?.get(player).map(String::as_str)
    }

    pub fn has_stat(&self, category: &str) -> bool {
        self.stats.get(category).is_some_and(|by_player| !by_player.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveLogEntry {
    pub move_number: u32,
    #[serde(default)]
    pub actions: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLog {
    pub table_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub log_entries: Vec<MoveLogEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_games: Option<usize>,
    pub games: Vec<GameRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_logs: Option<usize>,
    pub logs: Vec<GameLog>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/* ---------------- Loading ---------------- */

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

/// Missing collection is a hard error for the main documents,
/// but an empty one for the "new_*.json" scrape drops.
fn decode<T: DeserializeOwned>(
    path: &Path,
    mut value: Value,
    collection: &'static str,
    required: bool,
) -> Result<T> {
    let present = value.get(collection).is_some_and(|v| !v.is_null());
    if !present {
        if required {
            return Err(Error::MissingCollection { path: path.to_path_buf(), collection });
        }
        if let Some(obj) = value.as_object_mut() {
            obj.insert(collection.to_string(), Value::Array(Vec::new()));
        }
    }
    serde_json::from_value(value).map_err(|e| Error::json(path, e))
}

pub fn load_games(path: &Path) -> Result<GamesDocument> {
    let doc: GamesDocument = decode(path, read_json(path)?, "games", true)?;
    log::info!("Loaded {} games from {}", doc.games.len(), path.display());
    Ok(doc)
}

pub fn load_logs(path: &Path) -> Result<LogsDocument> {
    let doc: LogsDocument = decode(path, read_json(path)?, "logs", true)?;
    log::info!("Loaded {} logs from {}", doc.logs.len(), path.display());
    Ok(doc)
}

pub fn parse_games(text: &str) -> Result<GamesDocument> {
    let value = serde_json::from_str(text).map_err(|e| Error::json("<memory>", e))?;
    decode(Path::new("<memory>"), value, "games", true)
}

pub fn parse_logs(text: &str) -> Result<LogsDocument> {
    let value = serde_json::from_str(text).map_err(|e| Error::json("<memory>", e))?;
    decode(Path::new("<memory>"), value, "logs", true)
}

/* ---------------- Saving ---------------- */

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    let text = serde_json::to_string_pretty(value).map_err(|e| Error::json(path, e))?;
    fs::write(path, text).map_err(|e| Error::io(path, e))
}

pub fn save_games(path: &Path, doc: &GamesDocument) -> Result<()> {
    write_json(path, doc)
}

pub fn save_logs(path: &Path, doc: &LogsDocument) -> Result<()> {
    write_json(path, doc)
}

/* ---------------- Merging ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: Vec<String>,
    pub total: usize,
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Append records whose table id is not present yet. Order of arrival is kept.
fn merge_by_table<T>(existing: &mut Vec<T>, incoming: Vec<T>, id: impl Fn(&T) -> &str) -> Vec<String> {
    let mut seen: HashSet<String> = existing.iter().map(|r| id(r).to_string()).collect();
    let mut added = Vec::new();
    for record in incoming {
        let key = id(&record).to_string();
        if seen.insert(key.clone()) {
            existing.push(record);
            added.push(key);
        }
    }
    added
}

pub fn merge_games(existing: &mut GamesDocument, incoming: Vec<GameRecord>) -> MergeOutcome {
    let added = merge_by_table(&mut existing.games, incoming, |g| g.table_id.as_str());
    existing.exported_at = Some(now_stamp());
    existing.total_games = Some(existing.games.len());
    MergeOutcome { added, total: existing.games.len() }
}

pub fn merge_logs(existing: &mut LogsDocument, incoming: Vec<GameLog>) -> MergeOutcome {
    let added = merge_by_table(&mut existing.logs, incoming, |l| l.table_id.as_str());
    existing.exported_at = Some(now_stamp());
    existing.total_logs = Some(existing.logs.len());
    MergeOutcome { added, total: existing.logs.len() }
}

/// Merge `new_path` into `existing_path` on disk. When something was added, the new
/// file is reset to an empty collection so the next scrape starts clean.
pub fn merge_games_file(existing_path: &Path, new_path: &Path) -> Result<MergeOutcome> {
    let mut existing = load_games(existing_path)?;
    let incoming: GamesDocument = decode(new_path, read_json(new_path)?, "games", false)?;
    let outcome = merge_games(&mut existing, incoming.games);
    save_games(existing_path, &existing)?;
    if !outcome.added.is_empty() {
        write_json(new_path, &serde_json::json!({ "games": [] }))?;
    }
    log::info!("Games: added {} (total {})", outcome.added.len(), outcome.total);
    Ok(outcome)
}

pub fn merge_logs_file(existing_path: &Path, new_path: &Path) -> Result<MergeOutcome> {
    let mut existing = load_logs(existing_path)?;
    let incoming: LogsDocument = decode(new_path, read_json(new_path)?, "logs", false)?;
    let outcome = merge_logs(&mut existing, incoming.logs);
    save_logs(existing_path, &existing)?;
    if !outcome.added.is_empty() {
        write_json(new_path, &serde_json::json!({ "logs": [] }))?;
    }
    log::info!("Logs: added {} (total {})", outcome.added.len(), outcome.total);
    Ok(outcome)
}
