//! SQLite adapter for the itinerary store.
//!
//! [`Database`] wraps one `rusqlite` connection and implements every storage
//! trait in [`crate::store`]. Queries are split by table across the
//! `*_queries` modules; transaction control and the ordinal primitives live in
//! [`ordinal_queries`].
//!
//! Transactions are opened with `BEGIN IMMEDIATE`, which takes SQLite's
//! write lock up front. That lock is what serializes structural changes to a
//! parent; waiting for it is bounded by the connection's busy timeout.

use std::{path::PathBuf, str::FromStr, time::Duration};

use rusqlite::{types::Type, Connection, Row};

use crate::error::{DatabaseResultExt, Result};

pub mod catalog_queries;
pub mod day_queries;
pub mod item_queries;
pub mod migrations;
pub mod ordinal_queries;
pub mod trip_queries;

/// Default time a transaction waits for the write lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings every connection is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file
    pub path: PathBuf,
    /// How long `begin` waits for another writer before failing
    pub lock_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }
}

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a connection with default settings and initializes the schema.
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let db = Self::open(&DatabaseConfig::new(path))?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a connection to an already initialized database.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let connection =
            Connection::open(&config.path).db_context("Failed to open database connection")?;

        connection
            .busy_timeout(config.lock_timeout)
            .db_context("Failed to set busy timeout")?;
        connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        Ok(Self { connection })
    }
}

/// Reads a text column and parses it with `FromStr`.
pub(crate) fn parse_column<T>(row: &Row, index: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    row.get::<_, String>(index)?
        .parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Like [`parse_column`] for nullable columns.
pub(crate) fn parse_optional_column<T>(row: &Row, index: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    row.get::<_, Option<String>>(index)?
        .map(|text| {
            text.parse::<T>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
            })
        })
        .transpose()
}
