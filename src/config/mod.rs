// Configuration module entry point
// Resolves defaults, config file, environment and command-line flags into one immutable Config

mod cli;
mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::StartupError;

// Re-export public types
pub use cli::Cli;
pub use state::AppState;
pub use types::{Config, FilesConfig, LoadingMode, LoggingConfig, ServerConfig};

const DEFAULT_CONFIG_FILE: &str = "sv";

impl Config {
    /// Resolve configuration for the given command line.
    ///
    /// Precedence, lowest first: built-in defaults, the config file (`sv.toml` unless
    /// `--config` names another), `SV_*` environment variables, command-line flags.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);

        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("files.root", ".")?
            .set_default("files.exclude", r"^\.")?
            .set_default("files.mode", LoadingMode::Lazy.as_str())?
            .set_default("files.max_size_mb", 24)?
            .set_default("logging.quiet", false)?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "combined")?
            .add_source(config::File::with_name(config_path).required(cli.config.is_some()))
            .add_source(
                config::Environment::with_prefix("SV")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "files.root",
                cli.dir.as_ref().map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option("server.workers", cli.workers.map(i64::from))?
            .set_override_option("files.exclude", cli.exclude.clone())?
            .set_override_option("files.mode", cli.requested_mode().map(LoadingMode::as_str))?
            .set_override_option("files.max_size_mb", cli.max_size_mb.map(i64::from))?
            .set_override_option("logging.quiet", cli.quiet.then_some(true))?
            .set_override_option("logging.access_log", cli.access_log.then_some(true))?
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve the bind address; host names such as `localhost` are looked up.
    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        let mut resolved = (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|source| StartupError::Address {
                addr: addr.clone(),
                source,
            })?;
        resolved.next().ok_or_else(|| StartupError::Address {
            addr,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no address resolved"),
        })
    }

    /// Host and port as advertised in log lines
    pub fn advertised_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
