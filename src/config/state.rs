// Application state module
// Everything a request handler reads; built once at startup and never mutated

use super::types::Config;
use crate::logger::AccessLogFormat;
use crate::routing::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    /// Parsed once from `logging.access_log_format`; `None` when access logging is off
    pub access_log: Option<AccessLogFormat>,
}

impl AppState {
    pub fn new(config: Config, routes: RouteTable) -> Self {
        let access_log = config
            .logging
            .access_log
            .then(|| AccessLogFormat::parse(&config.logging.access_log_format));

        Self {
            config,
            routes,
            access_log,
        }
    }
}
