// Command-line flags
// Every flag is optional so that unset flags fall through to the config file and environment

use clap::Parser;
use std::path::PathBuf;

use super::types::LoadingMode;

#[derive(Parser, Debug, Default)]
#[command(name = "sv")]
#[command(about = "sv is a tool to run a http server easy-peasy.", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Folder to be broadcast
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Address on which server is broadcasted
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port on which server is broadcasted
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Exclude directories with matching regexp pattern [default: ^\.]
    #[arg(short = 'x', long)]
    pub exclude: Option<String>,

    /// How files are loaded [default: lazy]
    #[arg(short, long, value_enum)]
    pub mode: Option<LoadingMode>,

    /// Load every file into memory at startup (same as --mode eager)
    #[arg(short, long, conflicts_with = "mode")]
    pub eager: bool,

    /// Open files on every request (same as --mode lazy)
    #[arg(short, long, conflicts_with_all = ["mode", "eager"])]
    pub lazy: bool,

    /// Lazy responses above this size in MB are sent as attachments [default: 24]
    #[arg(short = 's', long = "max-size")]
    pub max_size_mb: Option<u32>,

    /// Do not log registered routes
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every request
    #[arg(long)]
    pub access_log: bool,

    /// Config file, without extension [default: sv]
    #[arg(short, long)]
    pub config: Option<String>,

    /// Runtime worker threads [default: CPU cores]
    #[arg(short, long)]
    pub workers: Option<u32>,
}

impl Cli {
    /// Loading mode requested on the command line, if any
    pub const fn requested_mode(&self) -> Option<LoadingMode> {
        if self.eager {
            Some(LoadingMode::Eager)
        } else if self.lazy {
            Some(LoadingMode::Lazy)
        } else {
            self.mode
        }
    }
}
