// Configuration types module
// Defines all configuration-related data structures

use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// What gets served and how
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Directory whose tree is served
    pub root: PathBuf,
    /// Regular expression matched against every directory name below the root
    pub exclude: String,
    pub mode: LoadingMode,
    /// Lazy responses larger than this many megabytes are sent as attachments
    pub max_size_mb: u64,
}

/// When file contents are read
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoadingMode {
    /// Open and stream the file on every request
    Lazy,
    /// Read every file into memory before the listener opens
    Eager,
}

impl LoadingMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lazy => "lazy",
            Self::Eager => "eager",
        }
    }
}

impl fmt::Display for LoadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Suppress the per-route registration lines
    pub quiet: bool,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl FilesConfig {
    /// Attachment threshold in bytes (decimal megabytes)
    pub const fn attachment_threshold(&self) -> u64 {
        self.max_size_mb.saturating_mul(1_000_000)
    }
}
