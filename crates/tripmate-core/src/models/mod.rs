//! Data models for trips, trip days and schedule items, plus the region
//! and place catalog they refer to.
//!
//! These are the plain records the core hands back to the request layer.
//! They carry no behaviour beyond a few derived values; every structural
//! change goes through the sequencers in [`crate::sequencer`].
//!
//! # Ordinals
//!
//! [`TripDay::day_no`] and [`ScheduleItem::seq_no`] are 1-based and dense
//! within their parent: a trip with N days always has days `1..=N`, a day
//! with M items always has items `1..=M`.
//!
//! # Examples
//!
//! ```rust
//! use jiff::{civil::date, Timestamp};
//! use tripmate_core::models::Trip;
//!
//! let trip = Trip {
//!     id: 1,
//!     owner_id: 42,
//!     region_id: 3,
//!     title: "Kyoto".to_string(),
//!     start_date: date(2024, 1, 1),
//!     end_date: date(2024, 1, 3),
//!     day_count: 3,
//! #   created_at: Timestamp::now(),
//! #   updated_at: Timestamp::now(),
//! };
//! assert_eq!(trip.day_date(3), Some(date(2024, 1, 3)));
//! ```

pub mod page;
pub mod place;
pub mod region;
pub mod schedule_item;
pub mod trip;
pub mod trip_day;


pub use page::{Page, PageRequest};
pub use place::Place;
pub use region::Region;
pub use schedule_item::ScheduleItem;
pub use trip::Trip;
pub use trip_day::TripDay;
