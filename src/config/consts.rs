// src/config/consts.rs

// Input documents (same layout as the dashboard's docs/data folder)
pub const DEFAULT_GAMES_PATH: &str = "docs/data/detailed_games.json";
pub const DEFAULT_LOGS_PATH: &str = "docs/data/detailed_game_logs.json";
pub const DEFAULT_NEW_GAMES_PATH: &str = "scraper/new_games.json";
pub const DEFAULT_NEW_LOGS_PATH: &str = "scraper/new_logs.json";

// Stat categories read from the game records
pub const STAT_STARTING_POSITION: &str = "Starting position in first round";
pub const STAT_GAME_RESULT: &str = "Game result";
pub const STAT_MAP: &str = "Map";
pub const NOT_RANKED: &str = "not ranked";

// Players
pub const PLAYERS_PER_GAME: usize = 4;
pub const TRACKED_PLAYERS: [&str; PLAYERS_PER_GAME] =
    ["msiebert", "marksbrt", "AstroHood", "siebert23"];
pub const PLAYER_ALIASES: [(&str, &str); PLAYERS_PER_GAME] = [
    ("msiebert", "Matt"),
    ("marksbrt", "Mark"),
    ("AstroHood", "Callie"),
    ("siebert23", "Keith"),
];

// Scoring
pub const DEFAULT_STARTING_SCORE: i64 = -14;
pub const CP_TIER_THRESHOLD: u32 = 10;
pub const CP_LOW_TIER_POINTS: i64 = 2;
pub const CP_HIGH_TIER_POINTS: i64 = 3;

// Local store
pub const DEFAULT_LOG_FILE: &str = ".store/debug.log";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_SCORES_FILE: &str = "scores";
pub const DEFAULT_TURNS_FILE: &str = "turns";
pub const DEFAULT_TOP_TURNS: usize = 3;

// Concurrency
pub const WORKERS: usize = 4;
