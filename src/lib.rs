// src/lib.rs

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod players;
pub mod specs;

pub mod csv;
pub mod data;
pub mod file;
pub mod progress;
pub mod report;
pub mod runner;
pub mod score;
pub mod store;
