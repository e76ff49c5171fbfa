// src/error.rs
//! Hard failures only. Noisy log text never ends up here; see `specs`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed, but the top-level collection (`games` / `logs`) is absent.
    #[error("{path} has no `{collection}` collection")]
    MissingCollection {
        path: PathBuf,
        collection: &'static str,
    },

    #[error("Unknown table id: {0}")]
    UnknownTable(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Json { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
