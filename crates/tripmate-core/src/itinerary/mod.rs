//! Async entry point for the itinerary core.
//!
//! [`Itinerary`] is what a request layer holds on to. Every method opens its
//! own database connection on Tokio's blocking pool, runs one lifecycle or
//! sequencer operation on it and closes it again, so independent requests
//! never share a connection and can run concurrently. Structural changes to
//! the same trip or day still serialize inside SQLite.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Itinerary    │    │  TripLifecycle  │    │    Database     │
//! │ (trip_ops,      │───▶│  DaySequencer   │───▶│   (via db/)     │
//! │  day_ops,       │    │  ItemSequencer  │    │                 │
//! │  item_ops)      │    │                 │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!    async, per call        one transaction        SQLite adapter
//! ```
//!
//! Every trip, day and item method takes the acting user's id first. Only the
//! owner of a trip can see or change it. The region and place catalog in
//! `catalog_ops` is shared by everyone.
//!
//! # Usage
//!
//! ```rust
//! use jiff::civil::date;
//! use tripmate_core::{
//!     params::{CreateScheduleItem, ItemDetails, TripDetails},
//!     ItineraryBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let itinerary = ItineraryBuilder::new()
//!     .with_database_path("/tmp/tripmate.db")
//!     .build()
//!     .await?;
//!
//! let actor_id = 42;
//! let trip = itinerary
//!     .create_trip(
//!         actor_id,
//!         &TripDetails {
//!             region_id: 1,
//!             title: "Lisbon".to_string(),
//!             start_date: date(2024, 6, 1),
//!             end_date: date(2024, 6, 4),
//!         },
//!     )
//!     .await?;
//!
//! let item = itinerary
//!     .create_schedule_item(
//!         actor_id,
//!         &CreateScheduleItem {
//!             trip_id: trip.id,
//!             day_no: 1,
//!             seq_no: None,
//!             details: ItemDetails {
//!                 memo: Some("Tram 28".to_string()),
//!                 ..Default::default()
//!             },
//!         },
//!     )
//!     .await?;
//! assert_eq!(item.seq_no, 1);
//! # Ok(())
//! # }
//! ```

use tokio::task;

use crate::{
    db::{Database, DatabaseConfig},
    error::{Result, TripmateError},
};

pub mod builder;
pub mod catalog_ops;
pub mod day_ops;
pub mod item_ops;
pub mod trip_ops;


/// Async handle onto one itinerary database.
#[derive(Debug, Clone)]
pub struct Itinerary {
    config: DatabaseConfig,
}

impl Itinerary {
    pub(crate) fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Settings each per-call connection is opened with.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Runs `op` against a fresh connection on the blocking pool.
    async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let config = self.config.clone();

        task::spawn_blocking(move || {
            let mut db = Database::open(&config)?;
            op(&mut db)
        })
        .await
        .map_err(|e| TripmateError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
