// src/data.rs
//
// The loaded, read-only view the analyses run against.
//
// - Games are filtered once, at construction, to completed four-player games
//   between exactly the tracked players (the only games the analyses accept).
// - Logs are kept whole; the biggest-turn ranking reads every log, not only the
//   ones with a valid game record.
// - Lookups go by table id.

use std::collections::{HashMap, HashSet};

use crate::config::consts::{PLAYERS_PER_GAME, STAT_GAME_RESULT, STAT_MAP};
use crate::config::options::DataOptions;
use crate::error::Result;
use crate::players::TrackedPlayers;
use crate::specs::results::is_not_ranked;
use crate::store::{self, GameLog, GameRecord, GamesDocument, LogsDocument};

/// Completed four-player game between exactly the tracked players.
pub fn is_valid_game(game: &GameRecord, tracked: &TrackedPlayers) -> bool {
    if game.players.len() != PLAYERS_PER_GAME {
        return false;
    }
    let distinct: HashSet<&str> = game.players.iter().map(String::as_str).collect();
    if distinct.len() != tracked.len() || !tracked.iter().all(|p| distinct.contains(p)) {
        return false;
    }

    // Ark Nova games carry a Map stat; other titles in the export don't.
    if !game.has_stat(STAT_MAP) {
        return false;
    }

    game.stats
        .get(STAT_GAME_RESULT)
        .map(|results| results.values().all(|r| !is_not_ranked(r)))
        .unwrap_or(true)
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    games: Vec<GameRecord>,
    logs: Vec<GameLog>,
    game_ix: HashMap<String, usize>,
    log_ix: HashMap<String, usize>,
    rejected: usize,
}

impl Dataset {
    pub fn load(data: &DataOptions, tracked: &TrackedPlayers) -> Result<Self> {
        let games = store::load_games(&data.games_path)?;
        let logs = store::load_logs(&data.logs_path)?;
        Ok(Self::from_documents(games, logs, tracked))
    }

    pub fn from_documents(games: GamesDocument, logs: LogsDocument, tracked: &TrackedPlayers) -> Self {
        let total = games.games.len();
        let games: Vec<GameRecord> = games
            .games
            .into_iter()
            .filter(|g| is_valid_game(g, tracked))
            .collect();
        let rejected = total - games.len();
        if rejected > 0 {
            log::info!("Skipped {rejected} of {total} games (player set, map or ranking)");
        }

        // First record wins on duplicate table ids
        let mut game_ix = HashMap::with_capacity(games.len());
        for (i, g) in games.iter().enumerate() {
            game_ix.entry(g.table_id.clone()).or_insert(i);
        }
        let mut log_ix = HashMap::with_capacity(logs.logs.len());
        for (i, l) in logs.logs.iter().enumerate() {
            log_ix.entry(l.table_id.clone()).or_insert(i);
        }

        Self { games, logs: logs.logs, game_ix, log_ix, rejected }
    }

    pub fn games(&self) -> &[GameRecord] { &self.games }
    pub fn logs(&self) -> &[GameLog] { &self.logs }

    /// Number of game records dropped by `is_valid_game`.
    pub fn rejected(&self) -> usize { self.rejected }

    pub fn game(&self, table_id: &str) -> Option<&GameRecord> {
        self.game_ix.get(table_id).map(|&i| &self.games[i])
    }

    /// Companion log for a game. None means "no chart for this game", not an error.
    pub fn log_for(&self, table_id: &str) -> Option<&GameLog> {
        self.log_ix.get(table_id).map(|&i| &self.logs[i])
    }
}
