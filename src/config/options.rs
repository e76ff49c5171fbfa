// src/config/options.rs
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::consts::*;
use crate::error::{Error, Result};
use crate::players::TrackedPlayers;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    pub data: DataOptions,
    pub players: TrackedPlayers,
    pub export: ExportOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            data: DataOptions::default(),
            players: TrackedPlayers::default(),
            export: ExportOptions::default(),
        }
    }
}

impl AppOptions {
    /// Layer a JSON config file over the current options.
    /// Only keys present in the file are applied.
    pub fn apply_config_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let file: ConfigFile = serde_json::from_str(&text).map_err(|e| Error::json(path, e))?;
        self.apply_config(file);
        Ok(())
    }

    pub fn apply_config(&mut self, file: ConfigFile) {
        if let Some(ids) = file.players {
            let aliases = file.aliases.unwrap_or_default();
            self.players = TrackedPlayers::new(ids).with_aliases(aliases);
        } else if let Some(aliases) = file.aliases {
            self.players = self.players.clone().with_aliases(aliases);
        }
        if let Some(p) = file.games_path {
            self.data.games_path = p;
        }
        if let Some(p) = file.logs_path {
            self.data.logs_path = p;
        }
        if let Some(p) = file.log_file {
            self.data.log_file = p;
        }
    }
}

/// On-disk config (`--config file.json`). Every key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub players: Option<Vec<String>>,
    pub aliases: Option<BTreeMap<String, String>>,
    pub games_path: Option<PathBuf>,
    pub logs_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataOptions {
    pub games_path: PathBuf,
    pub logs_path: PathBuf,
    pub log_file: PathBuf,
}

impl Default for DataOptions {
    fn default() -> Self {
        Self {
            games_path: PathBuf::from(DEFAULT_GAMES_PATH),
            logs_path: PathBuf::from(DEFAULT_LOGS_PATH),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportType {
    SingleFile,
    PerGame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    /// Field separator for the delimited formats; None for JSON.
    pub fn delim(&self) -> Option<char> {
        match self {
            ExportFormat::Csv => Some(','),
            ExportFormat::Tsv => Some('\t'),
            ExportFormat::Json => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "tsv" => Some(ExportFormat::Tsv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub export_type: ExportType,
    out_path: OutputPath,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            export_type: ExportType::SingleFile,
            out_path: OutputPath::default(),
            include_headers: false,
        }
    }
}

impl ExportOptions {
    /// Single file: `<dir>/<stem>.<ext>`, where a user-typed extension wins over the format's.
    /// Per game: the directory only.
    pub fn out_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();
        match self.export_type {
            ExportType::SingleFile => {
                let mut name = self.out_path.file_stem.clone();
                name.push(".");
                match &self.out_path.user_ext {
                    Some(ext) => name.push(ext),
                    None => name.push(self.format.ext()),
                }
                path.push(name);
            }
            ExportType::PerGame => {}
        }
        path
    }

    /// Parse a user path into dir + stem (+ extension, if one was typed).
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        match self.export_type {
            ExportType::SingleFile => {
                let p = Path::new(s);
                if let Some(parent) = p.parent() {
                    self.out_path.dir = parent.to_path_buf();
                }
                if let Some(stem) = p.file_stem() {
                    self.out_path.file_stem = stem.to_os_string();
                }
                self.out_path.user_ext = p.extension().map(|e| e.to_os_string());
            }
            ExportType::PerGame => {
                self.out_path.dir = PathBuf::from(s);
                self.out_path.user_ext = None;
            }
        }
    }

    /// Swap the default file stem (e.g. "scores" → "turns") unless the user chose one.
    pub fn set_default_stem(&mut self, stem: &str) {
        if self.out_path.is_default_stem() {
            self.out_path.file_stem = OsString::from(stem);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct OutputPath {
    dir: PathBuf,
    file_stem: OsString,
    user_ext: Option<OsString>,
}

impl OutputPath {
    fn is_default_stem(&self) -> bool {
        self.file_stem == DEFAULT_SCORES_FILE || self.file_stem == DEFAULT_TURNS_FILE
    }
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_SCORES_FILE),
            user_ext: None,
        }
    }
}
