//! Server state management.

use std::sync::Arc;

use memento_core::{MemoryService, SqliteStore};

use crate::auth::SessionManager;
use crate::config::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The memory access layer.
    pub service: MemoryService,
    /// Session table and user directory.
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Create application state from explicit collaborators.
    pub fn new(service: MemoryService, sessions: Arc<SessionManager>) -> Self {
        Self { service, sessions }
    }

    /// Wire up state over a single SQLite store, per the server config.
    pub fn with_store(store: SqliteStore, config: &ServerConfig) -> Self {
        let directory = Arc::new(store.clone());
        Self {
            service: MemoryService::new(Arc::new(store)),
            sessions: Arc::new(SessionManager::new(directory, config.session_ttl_secs)),
        }
    }
}
