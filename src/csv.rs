// src/csv.rs
use std::io::{self, Write};

use crate::report::DataSet;

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Render `rows` (and the header line, if asked for and present) as one string.
pub fn to_export_string(
    headers: Option<&[String]>,
    rows: &[Vec<String>],
    include_headers: bool,
    sep: char,
) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if include_headers {
        if let Some(h) = headers {
            let _ = write_row(&mut buf, h, sep);
        }
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

pub fn dataset_to_string(ds: &DataSet, include_headers: bool, sep: char) -> String {
    to_export_string(ds.headers.as_deref(), &ds.rows, include_headers, sep)
}
