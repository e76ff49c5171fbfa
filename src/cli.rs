// src/cli.rs
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use log::LevelFilter;

use crate::{
    config::{
        consts::{DEFAULT_NEW_GAMES_PATH, DEFAULT_NEW_LOGS_PATH, DEFAULT_SCORES_FILE, DEFAULT_TOP_TURNS, DEFAULT_TURNS_FILE},
        options::{AppOptions, ExportFormat, ExportType},
    },
    data::Dataset,
    file,
    progress::Progress,
    report, runner, store,
};

#[derive(Parser, Debug)]
#[command(name = "ark_stats", version, about = "Score reconstruction and turn analysis for Ark Nova game logs")]
pub struct Cli {
    /// Games document ({"games": [...]})
    #[arg(long, global = true)]
    games: Option<PathBuf>,

    /// Move-log document ({"logs": [...]})
    #[arg(long, global = true)]
    logs: Option<PathBuf>,

    /// JSON config: tracked players, aliases, paths
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level file log
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Export destination. Nothing is written without it.
    #[arg(short, long)]
    out: Option<String>,

    #[arg(long, value_parser = parse_format, default_value = "csv")]
    format: ExportFormat,

    #[arg(long)]
    include_headers: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct scores and compare them with the recorded results
    Scores {
        /// Only this table id
        #[arg(long)]
        table: Option<String>,

        /// One file per game; --out is then a directory
        #[arg(long)]
        per_game: bool,

        /// Export the reconciliation table instead of the score series
        #[arg(long)]
        reconcile: bool,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Rank the biggest single turns across all logs
    Turns {
        /// How many to print
        #[arg(long, default_value_t = DEFAULT_TOP_TURNS)]
        top: usize,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Fold newly scraped games and logs into the main documents
    Merge {
        #[arg(long, default_value = DEFAULT_NEW_GAMES_PATH)]
        new_games: PathBuf,

        #[arg(long, default_value = DEFAULT_NEW_LOGS_PATH)]
        new_logs: PathBuf,
    },
}

fn parse_format(s: &str) -> std::result::Result<ExportFormat, String> {
    ExportFormat::parse(s).ok_or_else(|| format!("unknown format `{s}` (csv, tsv, json)"))
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn options(&self) -> Result<AppOptions> {
        let mut opts = AppOptions::default();
        if let Some(path) = &self.config {
            opts.apply_config_file(path).wrap_err("loading config")?;
        }
        if let Some(p) = &self.games {
            opts.data.games_path = p.clone();
        }
        if let Some(p) = &self.logs {
            opts.data.logs_path = p.clone();
        }
        if let Some(p) = &self.log_file {
            opts.data.log_file = p.clone();
        }
        Ok(opts)
    }
}

fn apply_export(opts: &mut AppOptions, args: &ExportArgs, export_type: ExportType, stem: &str) {
    let export = &mut opts.export;
    export.format = args.format;
    export.export_type = export_type;
    export.include_headers = args.include_headers;
    export.set_default_stem(stem);
    if let Some(out) = &args.out {
        export.set_path(out);
    }
}

/// Progress on stderr so stdout stays clean for the results.
#[derive(Default)]
struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Processing {total} item(s)…");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, _table_id: &str) {
        self.done += 1;
    }
    fn item_skipped(&mut self, table_id: &str, reason: &str) {
        self.done += 1;
        log::debug!("[{}/{}] table {table_id} skipped: {reason}", self.done, self.total);
    }
    fn finish(&mut self) {
        eprintln!("Done ({}/{}).", self.done, self.total);
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut opts = cli.options()?;

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    crate::log::init(&opts.data.log_file, level);
    log::info!("ark_stats {} {:?}", env!("CARGO_PKG_VERSION"), cli.command);

    let mut out = io::stdout().lock();
    match &cli.command {
        Command::Scores { table, per_game, reconcile, export } => {
            let export_type = if *per_game { ExportType::PerGame } else { ExportType::SingleFile };
            apply_export(&mut opts, export, export_type, DEFAULT_SCORES_FILE);
            let dataset = load(&opts)?;
            let mut progress = StderrProgress::default();
            let report = runner::run_scores(&dataset, &opts.players, table.as_deref(), Some(&mut progress))?;

            for game in &report.games {
                let line = if game.reconciliation.entries.is_empty() {
                    "no recorded scores".to_string()
                } else {
                    game.reconciliation.summary_line(&opts.players)
                };
                writeln!(out, "{} {}: {line}", game.table_id, game.date.as_deref().unwrap_or("-"))?;
            }
            let exact = report.games.iter().filter(|g| g.reconciliation.is_exact()).count();
            writeln!(
                out,
                "{} games, {exact} exact, {} skipped (no log)",
                report.games.len(),
                report.skipped.len()
            )?;

            if export.out.is_some() {
                let written = match (opts.export.format, *reconcile) {
                    (ExportFormat::Json, false) if *per_game => file::export_json_per_game(
                        &opts.export,
                        report.games.iter().map(|g| (g.table_id.as_str(), g)),
                    )?,
                    (ExportFormat::Json, true) if *per_game => file::export_json_per_game(
                        &opts.export,
                        report.games.iter().map(|g| (g.table_id.as_str(), &g.reconciliation)),
                    )?,
                    (ExportFormat::Json, false) => vec![file::export_json(&opts.export, &report)?],
                    (ExportFormat::Json, true) => {
                        let recs: Vec<_> = report.games.iter().map(|g| &g.reconciliation).collect();
                        vec![file::export_json(&opts.export, &recs)?]
                    }
                    (_, false) => file::export_dataset(&opts.export, &report::score_rows(&report.games, &opts.players))?,
                    (_, true) => file::export_dataset(
                        &opts.export,
                        &report::reconciliation_rows(&report.games, &opts.players),
                    )?,
                };
                print_written(&mut out, &written)?;
            }
        }

        Command::Turns { top, export } => {
            apply_export(&mut opts, export, ExportType::SingleFile, DEFAULT_TURNS_FILE);
            let dataset = load(&opts)?;
            let mut progress = StderrProgress::default();
            let turns = runner::run_turns(&dataset, &opts.players, Some(&mut progress));

            for (i, t) in turns.iter().take(*top).enumerate() {
                writeln!(out, "{}. {}", i + 1, report::turn_line(t, &opts.players))?;
            }
            if turns.is_empty() {
                writeln!(out, "No scoring turns found.")?;
            }

            if export.out.is_some() {
                let written = match opts.export.format {
                    ExportFormat::Json => vec![file::export_json(&opts.export, &turns)?],
                    _ => file::export_dataset(&opts.export, &report::turn_rows(&turns, &opts.players))?,
                };
                print_written(&mut out, &written)?;
            }
        }

        Command::Merge { new_games, new_logs } => {
            merge_one(&mut out, "games", new_games, |n| store::merge_games_file(&opts.data.games_path, n))?;
            merge_one(&mut out, "logs", new_logs, |n| store::merge_logs_file(&opts.data.logs_path, n))?;
        }
    }
    Ok(())
}

fn load(opts: &AppOptions) -> Result<Dataset> {
    let dataset = Dataset::load(&opts.data, &opts.players).wrap_err("loading game data")?;
    if dataset.rejected() > 0 {
        eprintln!("Ignoring {} game(s) outside the tracked player set", dataset.rejected());
    }
    Ok(dataset)
}

fn print_written(out: &mut impl Write, paths: &[PathBuf]) -> Result<()> {
    for p in paths {
        writeln!(out, "Wrote {}", p.display())?;
    }
    Ok(())
}

fn merge_one(
    out: &mut impl Write,
    what: &str,
    new_path: &Path,
    merge: impl FnOnce(&Path) -> crate::error::Result<store::MergeOutcome>,
) -> Result<()> {
    if !new_path.exists() {
        writeln!(out, "No new {what} at {}", new_path.display())?;
        return Ok(());
    }
    let outcome = merge(new_path).wrap_err_with(|| format!("merging {what}"))?;
    writeln!(out, "{}: added {} (total {})", capitalize(what), outcome.added.len(), outcome.total)?;
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_layer_over_defaults() {
        let cli = Cli::try_parse_from(["ark_stats", "--games", "g.json", "turns", "--top", "5"]).unwrap();
        let opts = cli.options().unwrap();
        assert_eq!(opts.data.games_path, PathBuf::from("g.json"));
        assert!(matches!(cli.command, Command::Turns { top: 5, .. }));
    }

    #[test]
    fn per_game_scores_export_into_a_directory() {
        let cli = Cli::try_parse_from([
            "ark_stats", "scores", "--per-game", "--out", "out/games", "--format", "tsv",
        ])
        .unwrap();
        let mut opts = cli.options().unwrap();
        let Command::Scores { export, .. } = &cli.command else { panic!("not scores") };
        apply_export(&mut opts, export, ExportType::PerGame, DEFAULT_SCORES_FILE);
        assert_eq!(opts.export.format, ExportFormat::Tsv);
        assert_eq!(opts.export.out_path(), PathBuf::from("out/games"));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["ark_stats", "turns", "--format", "xlsx"]).is_err());
    }
}
