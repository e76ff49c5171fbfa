// src/progress.rs
/// Lightweight progress reporting for the per-game analyses.
/// The CLI implements this to print status to stderr.
pub trait Progress {
    /// Called at the start with the total number of games.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One game was analysed.
    fn item_done(&mut self, _table_id: &str) {}

    /// One game was passed over (e.g. it has no move log).
    fn item_skipped(&mut self, _table_id: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Counts callbacks; handy for tests and summaries.
#[derive(Debug, Default)]
pub struct Tally {
    pub total: usize,
    pub done: usize,
    pub skipped: Vec<(String, String)>,
    pub messages: Vec<String>,
    pub finished: bool,
}

impl Progress for Tally {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn log(&mut self, msg: &str) { self.messages.push(msg.to_string()); }
    fn item_done(&mut self, _table_id: &str) { self.done += 1; }
    fn item_skipped(&mut self, table_id: &str, reason: &str) {
        self.skipped.push((table_id.to_string(), reason.to_string()));
    }
    fn finish(&mut self) { self.finished = true; }
}
