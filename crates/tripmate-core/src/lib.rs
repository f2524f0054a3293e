//! Core library for the Tripmate travel itinerary service.
//!
//! A trip is split into numbered days and every day holds an ordered list of
//! schedule items. This crate owns the two orderings: `day_no` within a trip
//! and `seq_no` within a day are always `1..=N` with no gaps or duplicates,
//! whatever sequence of inserts, deletes and moves is applied and however
//! many requests arrive at once.
//!
//! # Layers
//!
//! - [`itinerary`]: async facade used by the request layer
//! - [`lifecycle`]: trip create / update / delete, including the initial days
//! - [`catalog`]: seeded regions and saved places that trips and items refer to
//! - [`sequencer`]: day and schedule item sequencing
//! - [`guard`]: ownership checks
//! - [`store`]: the storage traits, plus an in-memory adapter
//! - [`db`]: the SQLite adapter
//!
//! # Quick Start
//!
//! ```rust
//! use jiff::civil::date;
//! use tripmate_core::{
//!     params::{ReorderTripDay, TripDetails},
//!     ItineraryBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let itinerary = ItineraryBuilder::new()
//!     .with_database_path("test.db")
//!     .build()
//!     .await?;
//!
//! let trip = itinerary
//!     .create_trip(
//!         7,
//!         &TripDetails {
//!             region_id: 2,
//!             title: "Road trip".to_string(),
//!             start_date: date(2024, 3, 1),
//!             end_date: date(2024, 3, 3),
//!         },
//!     )
//!     .await?;
//!
//! let days = itinerary
//!     .reorder_trip_day(
//!         7,
//!         &ReorderTripDay {
//!             trip_id: trip.id,
//!             old_day_no: 3,
//!             new_day_no: 1,
//!         },
//!     )
//!     .await?;
//! assert_eq!(days.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod db;
pub mod error;
pub mod guard;
pub mod itinerary;
pub mod lifecycle;
pub mod models;
pub mod params;
pub mod sequencer;
pub mod store;

// Re-export commonly used types
pub use catalog::Catalog;
pub use db::{Database, DatabaseConfig};
pub use error::{ErrorKind, Result, TripmateError};
pub use itinerary::{builder::ItineraryBuilder, Itinerary};
pub use lifecycle::TripLifecycle;
pub use models::{Page, PageRequest, Place, Region, ScheduleItem, Trip, TripDay};
pub use params::{
    CreateScheduleItem, CreateTripDay, DayRef, ItemDetails, ItemRef, ListRegions,
    ListScheduleItems, ListTripDays, ListTrips, PlaceDetails, ReorderScheduleItem, ReorderTripDay,
    TripDetails, UpdateScheduleItem, UpdateTrip, UpdateTripDay,
};
pub use sequencer::{DaySequencer, ItemSequencer};
pub use store::{CatalogRecords, MemoryStore, Parent, Store};
