// =============================================================================
// Application State: shared, read-only after startup
// =============================================================================

use crate::runtime_config::ServiceConfig;
use crate::signals::SignalEngine;

/// Everything a request handler needs. The strategy set and the config never
/// change after startup, so handlers share this behind an `Arc` without locks.
pub struct AppState {
    pub engine: SignalEngine,
    pub config: ServiceConfig,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            engine: SignalEngine::default(),
            config,
        }
    }
}
