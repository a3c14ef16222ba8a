// Application state module
// Read-only per-process state shared by all connection tasks

use std::sync::atomic::AtomicBool;

use super::types::Config;

/// Application state
///
/// Constructed once at startup and shared behind an `Arc`. Nothing here is
/// mutated after construction, so request handlers never take locks.
pub struct AppState {
    pub config: Config,

    // Cached config value for fast access without touching the full config
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }
}
