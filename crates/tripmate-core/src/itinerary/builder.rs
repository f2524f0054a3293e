//! Builder for creating and configuring Itinerary instances.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::info;
use tokio::task;

use super::Itinerary;
use crate::{
    db::{Database, DatabaseConfig, DEFAULT_LOCK_TIMEOUT},
    error::{Result, TripmateError},
};

/// Builder for creating and configuring Itinerary instances.
#[derive(Debug, Clone)]
pub struct ItineraryBuilder {
    database_path: Option<PathBuf>,
    lock_timeout: Duration,
}

impl ItineraryBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/tripmate/tripmate.db` or
    /// `~/.local/share/tripmate/tripmate.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets how long a structural change waits for a concurrent one on the
    /// same database before failing with a retryable storage error.
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Builds the configured itinerary instance.
    ///
    /// # Errors
    ///
    /// Returns `TripmateError::FileSystem` if the database directory cannot be
    /// created
    /// Returns `TripmateError::Database` if database initialization fails
    pub async fn build(self) -> Result<Itinerary> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TripmateError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let config = DatabaseConfig::new(db_path).with_lock_timeout(self.lock_timeout);

        let init_config = config.clone();
        task::spawn_blocking(move || {
            let db = Database::open(&init_config)?;
            db.initialize_schema()
        })
        .await
        .map_err(|e| TripmateError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        info!("Itinerary database ready at {}", config.path.display());
        Ok(Itinerary::new(config))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("tripmate")
            .place_data_file("tripmate.db")
            .map_err(|e| TripmateError::XdgDirectory(e.to_string()))
    }
}

impl Default for ItineraryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
