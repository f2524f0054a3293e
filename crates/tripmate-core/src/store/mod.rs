//! Storage abstraction consumed by the sequencers.
//!
//! The sequencers never talk to SQL directly. They drive these traits:
//!
//! - [`Transactional`]: explicit begin / commit / rollback. The caller owns
//!   the transaction boundary and must roll back after any failure.
//! - [`OrdinalStore`]: parent-scoped primitives over the two dense sequences
//!   (`day_no` within a trip, `seq_no` within a trip day).
//! - [`TripRecords`], [`DayRecords`], [`ItemRecords`]: plain reads and
//!   non-structural writes, one trait per table.
//! - [`CatalogRecords`]: the region and place catalog that trips and schedule
//!   items refer to.
//!
//! [`Store`] is the union of them. Two adapters implement it:
//! [`crate::db::Database`] on SQLite and [`memory::MemoryStore`] in memory.
//!
//! # Ordinal primitives
//!
//! Every primitive assumes the caller has already called
//! [`OrdinalStore::lock_parent`] inside an open transaction. A schedule item
//! operation resolves its day from `(trip_id, day_no)`, so it locks the trip
//! before the day: an adapter with per-row locks must keep a concurrent day
//! reorder from renumbering the day in between. Shifts touch one
//! row at a time in an order that never makes two siblings share an ordinal,
//! so they are safe against storage that checks uniqueness per statement.

use std::fmt;

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{Page, PageRequest, Place, Region, ScheduleItem, Trip, TripDay},
    params::{ItemDetails, PlaceDetails, TripDetails},
};

pub mod memory;

pub use memory::MemoryStore;

/// Distance above the current maximum used to park a child during a
/// three-phase move.
pub const STAGING_OFFSET: u32 = 1000;

/// The owner of one ordinal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parent {
    /// Days of a trip, ordered by `day_no`
    Trip(u64),
    /// Items of a trip day, ordered by `seq_no`
    TripDay(u64),
}

impl Parent {
    pub fn id(&self) -> u64 {
        match self {
            Self::Trip(id) | Self::TripDay(id) => *id,
        }
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trip(id) => write!(f, "trip {id}"),
            Self::TripDay(id) => write!(f, "trip day {id}"),
        }
    }
}

/// Explicit transaction control.
pub trait Transactional {
    /// Opens a transaction. Adapters that cannot lock a single row take their
    /// write lock here.
    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;
}

/// Parent-scoped operations over a dense ordinal sequence.
pub trait OrdinalStore {
    /// Serializes structural changes against `parent` for the rest of the
    /// transaction.
    ///
    /// # Errors
    ///
    /// `ParentNotFound` when the parent row does not exist.
    fn lock_parent(&mut self, parent: Parent) -> Result<()>;

    /// Highest ordinal in use under `parent`, 0 when it has no children.
    fn max_ordinal(&self, parent: Parent) -> Result<u32>;

    /// Adds 1 to every ordinal `>= from`, highest first.
    fn shift_up_from(&mut self, parent: Parent, from: u32) -> Result<()>;

    /// Subtracts 1 from every ordinal `> deleted`, lowest first.
    fn shift_down_after(&mut self, parent: Parent, deleted: u32) -> Result<()>;

    /// Moves child `moving_id` from `old` to `new`: stage it at
    /// `max + STAGING_OFFSET`, shift the range between the two positions by
    /// one towards the gap, then settle it at `new`.
    fn move_via_range(&mut self, parent: Parent, old: u32, new: u32, moving_id: u64)
        -> Result<()>;

    /// Inserts a day at `day_no`. Room must already have been made.
    fn insert_day_at(&mut self, trip_id: u64, day_no: u32, memo: Option<&str>) -> Result<TripDay>;

    /// Inserts a schedule item at `seq_no`. Room must already have been made.
    fn insert_item_at(
        &mut self,
        trip_day_id: u64,
        seq_no: u32,
        details: &ItemDetails,
    ) -> Result<ScheduleItem>;

    /// Deletes the child at `ordinal`, leaving a gap for the caller to close
    /// with [`OrdinalStore::shift_down_after`]. Deleting a day removes its
    /// schedule items. Returns false when nothing sits at `ordinal`.
    fn delete_at(&mut self, parent: Parent, ordinal: u32) -> Result<bool>;
}

/// Trip rows.
pub trait TripRecords {
    fn insert_trip(&mut self, owner_id: u64, details: &TripDetails) -> Result<Trip>;

    /// Returns false when no trip has that id.
    fn update_trip(&mut self, trip_id: u64, details: &TripDetails) -> Result<bool>;

    /// Deletes the trip together with its days and their items.
    fn delete_trip(&mut self, trip_id: u64) -> Result<()>;

    fn find_trip(&self, trip_id: u64) -> Result<Option<Trip>>;

    /// Trips of `owner_id`, newest first.
    fn list_trips(&self, owner_id: u64, page: PageRequest) -> Result<Page<Trip>>;

    fn trip_owner(&self, trip_id: u64) -> Result<Option<u64>>;
}

/// Trip day rows, outside of ordinal changes.
pub trait DayRecords {
    /// Deletes every day of the trip together with their items.
    fn delete_trip_days(&mut self, trip_id: u64) -> Result<()>;

    fn find_trip_day(&self, trip_id: u64, day_no: u32) -> Result<Option<TripDay>>;

    fn list_trip_days(&self, trip_id: u64, page: PageRequest) -> Result<Page<TripDay>>;

    /// Every day of the trip in `day_no` order.
    fn trip_days(&self, trip_id: u64) -> Result<Vec<TripDay>>;

    fn update_trip_day_memo(&mut self, trip_day_id: u64, memo: Option<&str>) -> Result<()>;
}

/// Schedule item rows, outside of ordinal changes.
pub trait ItemRecords {
    /// Moves every visit time of the day's items by `days` calendar days.
    fn offset_visit_times(&mut self, trip_day_id: u64, days: i64) -> Result<()>;

    fn find_schedule_item(&self, item_id: u64) -> Result<Option<ScheduleItem>>;

    fn list_schedule_items(&self, trip_day_id: u64, page: PageRequest)
        -> Result<Page<ScheduleItem>>;

    /// Every item of the day in `seq_no` order.
    fn schedule_items(&self, trip_day_id: u64) -> Result<Vec<ScheduleItem>>;

    /// Partial update; `None` keeps the stored value.
    fn update_schedule_item(
        &mut self,
        item_id: u64,
        visit_time: Option<DateTime>,
        memo: Option<&str>,
    ) -> Result<()>;
}

/// Region and place rows.
///
/// `trips.region_id` and `schedule_items.place_id` reference these tables;
/// inserting a trip or item that names a missing row fails with a storage
/// error.
pub trait CatalogRecords {
    fn find_region(&self, region_id: u64) -> Result<Option<Region>>;

    /// Regions whose name contains `query` in any country, or every region of
    /// `country_code` when there is no query. Ordered by id.
    fn list_regions(&self, country_code: &str, query: Option<&str>) -> Result<Vec<Region>>;

    /// Inserts the place unless one with the same `external_ref` exists, and
    /// returns the stored row either way.
    fn upsert_place(&mut self, details: &PlaceDetails) -> Result<Place>;

    fn find_place(&self, place_id: u64) -> Result<Option<Place>>;
}

/// Everything a sequencer needs from storage.
pub trait Store:
    Transactional + OrdinalStore + TripRecords + DayRecords + ItemRecords + CatalogRecords
{
}

impl<T> Store for T where
    T: Transactional
        + OrdinalStore
        + TripRecords
        + DayRecords
        + ItemRecords
        + CatalogRecords
        + ?Sized
{
}
