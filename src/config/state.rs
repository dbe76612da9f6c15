// Application state module
// Everything a request handler needs, built once at startup and never mutated

use super::types::Config;
use crate::handler::Router;

/// Application state
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    pub const fn new(config: Config, router: Router) -> Self {
        Self { config, router }
    }
}
