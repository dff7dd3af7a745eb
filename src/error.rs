//! Startup error types
//!
//! Every variant is fatal: the server never starts serving with a partial route table.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid bind address '{addr}': {source}")]
    Address { addr: String, source: io::Error },

    #[error("Cannot access root directory '{}': {source}", path.display())]
    RootUnreadable { path: PathBuf, source: io::Error },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Invalid exclusion pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Cannot stat '{}': {source}", path.display())]
    Stat { path: PathBuf, source: io::Error },

    #[error("Failed to load '{}': {source}", path.display())]
    Load { path: PathBuf, source: io::Error },

    #[error("Failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("Failed to open log file: {0}")]
    Logger(io::Error),

    #[error("Runtime error: {0}")]
    Runtime(io::Error),
}
