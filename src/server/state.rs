//! Application state shared across handlers.

use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::library::scanner;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Database connection.
    pub db: Database,
    /// Whether a scan is currently in progress.
    scanning: Arc<AtomicBool>,
}

impl AppState {
    /// Create new application state with database.
    pub fn new_with_db(config: Config, db: Database) -> Self {
        Self {
            config: Arc::new(config),
            db,
            scanning: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Scan every library, skipping if a scan is already running.
    pub fn scan_all_libraries(&self) -> Result<()> {
        // Prevent concurrent scans
        if self.scanning.swap(true, Ordering::SeqCst) {
            tracing::info!("Scan already in progress, skipping");
            return Ok(());
        }

        let result = self.do_scan();
        self.scanning.store(false, Ordering::SeqCst);
        result
    }

    fn do_scan(&self) -> Result<()> {
        for library in self.db.list_libraries()? {
            if let Err(e) = scanner::sync(&self.db, &library) {
                // One broken library must not stop the others.
                tracing::warn!(library = %library.name, error = %e, "Scan failed");
            }
        }
        Ok(())
    }

    /// Start a background scan of all libraries (non-blocking).
    pub fn start_background_scan(&self) {
        let state = self.clone();
        std::thread::spawn(move || {
            if let Err(e) = state.scan_all_libraries() {
                tracing::error!(error = %e, "Background scan failed");
            }
        });
    }
}
