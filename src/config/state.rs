// Application state module
// Owns the film store and the shutdown coordination primitives

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

use super::types::Config;
use crate::film::FilmStore;

/// Application state shared by every connection task
pub struct AppState {
    pub config: Config,
    /// The single in-memory store; writers hold the lock for a whole mutation
    pub store: RwLock<FilmStore>,
    /// Fired once when a shutdown signal arrives
    pub shutdown_signal: Arc<Notify>,
    /// Wakes open connections so they close after their current request
    pub drain_signal: Notify,

    shutdown_requested: AtomicBool,
    access_log: bool,
}

impl AppState {
    /// Create `AppState` with the seeded store
    pub fn new(config: &Config) -> Self {
        Self::with_store(config, FilmStore::seeded())
    }

    pub fn with_store(config: &Config, store: FilmStore) -> Self {
        Self {
            config: config.clone(),
            store: RwLock::new(store),
            shutdown_signal: Arc::new(Notify::new()),
            drain_signal: Notify::new(),
            shutdown_requested: AtomicBool::new(false),
            access_log: config.logging.access_log,
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.access_log
    }

    /// Mark the server as draining and wake every open connection
    pub fn begin_drain(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.drain_signal.notify_waiters();
    }

    pub fn is_draining(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}
