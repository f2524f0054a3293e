//! Error types for the itinerary core.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::Parent;

/// Comprehensive error type for all itinerary operations.
#[derive(Error, Debug)]
pub enum TripmateError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Storage failures that do not originate from SQLite
    #[error("Storage error: {message}")]
    Storage { message: String },
    /// Trip not found for the given ID
    #[error("Trip with ID {id} not found")]
    TripNotFound { id: u64 },
    /// No day at the given position of the trip
    #[error("Day {day_no} of trip {trip_id} not found")]
    TripDayNotFound { trip_id: u64, day_no: u32 },
    /// Schedule item not found for the given ID
    #[error("Schedule item with ID {id} not found")]
    ScheduleItemNotFound { id: u64 },
    /// Place not found for the given ID
    #[error("Place with ID {id} not found")]
    PlaceNotFound { id: u64 },
    /// The parent row of an ordinal sequence disappeared before it was locked
    #[error("{parent} not found")]
    ParentNotFound { parent: Parent },
    /// The actor does not own the trip
    #[error("Actor {actor_id} may not access trip {trip_id}")]
    Forbidden { trip_id: u64, actor_id: u64 },
    /// Requested ordinal lies outside the valid range
    #[error("Position {position} is out of range for {parent} (valid: 1..={max})")]
    InvalidPosition {
        parent: Parent,
        position: u32,
        max: u32,
    },
    /// Item exists but belongs to a different day than the one requested
    #[error("Schedule item {item_id} does not belong to trip day {trip_day_id}")]
    Mismatch { item_id: u64, trip_day_id: u64 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Failure classes the request layer maps onto its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    InvalidPosition,
    Mismatch,
    InvalidInput,
    Storage,
}

impl TripmateError {
    /// Creates a new database error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.into(),
            source,
        }
    }

    /// Creates a storage error from a plain message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates an input validation error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Classifies the error.
    ///
    /// Environment failures (file system, XDG lookup, task joins) count as
    /// storage failures: the request never reached a consistent state and the
    /// whole request may be retried.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TripNotFound { .. }
            | Self::TripDayNotFound { .. }
            | Self::ScheduleItemNotFound { .. }
            | Self::PlaceNotFound { .. }
            | Self::ParentNotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::InvalidPosition { .. } => ErrorKind::InvalidPosition,
            Self::Mismatch { .. } => ErrorKind::Mismatch,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::Database { .. }
            | Self::Storage { .. }
            | Self::FileSystem { .. }
            | Self::XdgDirectory(_)
            | Self::Configuration { .. } => ErrorKind::Storage,
        }
    }

    /// Whether retrying the whole request may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TripmateError::database_error(message, e))
    }
}

/// Result type alias for itinerary operations
pub type Result<T> = std::result::Result<T, TripmateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_family_shares_kind() {
        let errors = [
            TripmateError::TripNotFound { id: 1 },
            TripmateError::TripDayNotFound {
                trip_id: 1,
                day_no: 2,
            },
            TripmateError::ScheduleItemNotFound { id: 3 },
            TripmateError::PlaceNotFound { id: 5 },
            TripmateError::ParentNotFound {
                parent: Parent::TripDay(4),
            },
        ];
        for error in &errors {
            assert_eq!(error.kind(), ErrorKind::NotFound, "{error}");
            assert!(!error.is_retryable());
        }
    }

    #[test]
    fn test_only_storage_failures_are_retryable() {
        let busy = TripmateError::database_error(
            "Failed to begin transaction",
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
                None,
            ),
        );
        assert_eq!(busy.kind(), ErrorKind::Storage);
        assert!(busy.is_retryable());
        assert!(TripmateError::storage("lock wait timeout").is_retryable());

        let forbidden = TripmateError::Forbidden {
            trip_id: 1,
            actor_id: 2,
        };
        assert_eq!(forbidden.kind(), ErrorKind::Forbidden);
        assert!(!forbidden.is_retryable());
    }

    #[test]
    fn test_messages_carry_context() {
        let error = TripmateError::InvalidPosition {
            parent: Parent::Trip(7),
            position: 5,
            max: 4,
        };
        assert_eq!(
            error.to_string(),
            "Position 5 is out of range for trip 7 (valid: 1..=4)"
        );
        let error = TripmateError::Mismatch {
            item_id: 9,
            trip_day_id: 3,
        };
        assert_eq!(
            error.to_string(),
            "Schedule item 9 does not belong to trip day 3"
        );
    }
}
