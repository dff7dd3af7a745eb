//! Route table and endpoint registry
//!
//! The table is filled once, before the listener opens, and only read afterwards.

use std::collections::HashMap;

use super::walker::Walker;
use crate::config::Config;
use crate::error::StartupError;
use crate::handler::Endpoint;
use crate::logger;

/// Exact-match mapping from URL path to endpoint
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<String, Endpoint>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `endpoint` to `route`.
    ///
    /// Last write wins: a route registered twice keeps the later endpoint and the
    /// displaced one is returned.
    pub fn insert(&mut self, route: String, endpoint: Endpoint) -> Option<Endpoint> {
        self.routes.insert(route, endpoint)
    }

    pub fn get(&self, route: &str) -> Option<&Endpoint> {
        self.routes.get(route)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

/// Walk the configured root and register one endpoint per file, in traversal order.
///
/// Eager mode reads every file here. The first walk or read error aborts registration.
pub fn build_route_table(config: &Config) -> Result<RouteTable, StartupError> {
    let walker = Walker::new(&config.files.root, &config.files.exclude)?;
    let advertised = config.advertised_addr();
    let mut table = RouteTable::new();

    for entry in walker.entries() {
        let entry = entry?;
        let route = entry.route.clone();

        if !config.logging.quiet {
            logger::log_route_registered(&entry.file_name(), &advertised, &route);
        }

        let endpoint = Endpoint::from_config(entry, &config.files)?;
        let current = endpoint.path().to_path_buf();
        if let Some(replaced) = table.insert(route.clone(), endpoint) {
            logger::log_route_replaced(&route, replaced.path(), &current);
        }
    }

    logger::log_registration_done(table.len(), config.files.mode);
    Ok(table)
}
