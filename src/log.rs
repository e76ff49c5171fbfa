// src/log.rs
// File sink behind the `log` facade. The library only ever calls log::debug!/info!/…;
// the binary installs this once at startup.
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Appends `[elapsed][LEVEL] message` lines to a single file.
pub struct FileLogger {
    path: PathBuf,
    level: LevelFilter,
    lock: Mutex<()>,
}

impl FileLogger {
    pub fn new(path: impl Into<PathBuf>, level: LevelFilter) -> Self {
        Self { path: path.into(), level, lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format_line(record: &Record) -> String {
        let elapsed = fmt_elapsed(start().elapsed().as_millis());
        format!("[{elapsed}][{}] {}\n", record.level(), record.args())
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::format_line(record);

        // Logging must never take the analysis down with it.
        if let Ok(_guard) = self.lock.lock() {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

/// Install the file logger as the global `log` sink.
/// Creates the parent directory; a second call is a no-op.
pub fn init(path: impl Into<PathBuf>, level: LevelFilter) {
    let logger = FileLogger::new(path, level);
    if let Some(parent) = logger.path().parent() {
        if !parent.as_os_str().is_empty() {
            let _ = fs::create_dir_all(parent);
        }
    }
    start();
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
