// Application state module
// Bundles the loaded configuration with the route table built at startup

use super::types::Config;
use crate::routing::RouteTable;

/// Application state shared by all connections
///
/// Both fields are read-only after startup, so no locking is needed at
/// request time.
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
}

impl AppState {
    pub const fn new(config: Config, routes: RouteTable) -> Self {
        Self { config, routes }
    }
}
