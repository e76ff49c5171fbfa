// src/file.rs

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::config::options::{ExportOptions, ExportType};
use crate::core::sanitize::sanitize_filename;
use crate::csv::{dataset_to_string, to_export_string};
use crate::error::{Error, Result};
use crate::report::{DataSet, GROUP_COLUMN};

fn delimiter(export: &ExportOptions) -> Result<char> {
    export
        .format
        .delim()
        .ok_or_else(|| Error::InvalidOption(format!("{} is not a delimited format", export.format.ext())))
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}

/// Write a data set according to ExportOptions (path, headers policy, delimiter, etc.).
/// Returns the paths written to.
pub fn export_dataset(export: &ExportOptions, ds: &DataSet) -> Result<Vec<PathBuf>> {
    match export.export_type {
        ExportType::SingleFile => write_export_single(export, ds).map(|p| vec![p]),
        ExportType::PerGame => write_export_per_game(export, ds),
    }
}

pub fn write_export_single(export: &ExportOptions, ds: &DataSet) -> Result<PathBuf> {
    let path = export.out_path();
    let contents = dataset_to_string(ds, export.include_headers, delimiter(export)?);
    write_text(&path, &contents)?;
    log::info!("Wrote {} rows to {}", ds.rows.len(), path.display());
    Ok(path)
}

/// One file per table id (column 0) in the directory `export.out_path()`.
/// Files come out in the order their table first appears.
pub fn write_export_per_game(export: &ExportOptions, ds: &DataSet) -> Result<Vec<PathBuf>> {
    let outdir = export.out_path();
    ensure_directory(&outdir)?;
    let sep = delimiter(export)?;

    let mut order: Vec<&str> = Vec::new();
    let mut by_game: HashMap<&str, Vec<Vec<String>>> = HashMap::new();
    for r in &ds.rows {
        let Some(table) = r.get(GROUP_COLUMN) else { continue };
        by_game
            .entry(table.as_str())
            .or_insert_with(|| {
                order.push(table.as_str());
                Vec::new()
            })
            .push(r.clone());
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(order.len());
    for table in order {
        let rows = by_game.remove(table).unwrap_or_default();
        let stem = sanitize_filename(table, "game");
        let path = resolve_filename(&outdir, &stem, &mut seen, export.format.ext());

        let contents = to_export_string(ds.headers.as_deref(), &rows, export.include_headers, sep);
        fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
        written.push(path);
    }
    log::info!("Wrote {} per-game files to {}", written.len(), outdir.display());
    Ok(written)
}

/// Pretty JSON of `value` at `export.out_path()`.
pub fn export_json<T: Serialize + ?Sized>(export: &ExportOptions, value: &T) -> Result<PathBuf> {
    let path = export.out_path();
    let text = serde_json::to_string_pretty(value).map_err(|e| Error::json(&path, e))?;
    write_text(&path, &text)?;
    log::info!("Wrote JSON to {}", path.display());
    Ok(path)
}

/// One pretty JSON file per (table id, value) pair in the directory `export.out_path()`.
pub fn export_json_per_game<'a, T, I>(export: &ExportOptions, items: I) -> Result<Vec<PathBuf>>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = (&'a str, &'a T)>,
{
    let outdir = export.out_path();
    ensure_directory(&outdir)?;

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::new();
    for (table, value) in items {
        let stem = sanitize_filename(table, "game");
        let path = resolve_filename(&outdir, &stem, &mut seen, "json");
        let text = serde_json::to_string_pretty(value).map_err(|e| Error::json(&path, e))?;
        fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
        written.push(path);
    }
    Ok(written)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::InvalidOption(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(())
}

/// Duplicate handling **only within this run**
pub fn resolve_filename(
    dir: &Path,
    stem: &str,                        // already sanitized, no extension
    seen_names: &mut HashMap<String, usize>,
    ext: &str,                         // "csv" | "tsv" | "json"
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };

    *count += 1;
    dir.join(filename)
}
