//! Parameter structures for itinerary operations
//!
//! These structures carry the already-validated payload of a request from the
//! request layer into the core. They are plain data: field formats (date
//! parsing, string lengths) are checked upstream, while the core only
//! enforces ownership and ordinal invariants.
//!
//! The acting user is never part of a parameter struct; every operation takes
//! the actor id as a separate argument so it cannot be smuggled in through a
//! request body.

use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};

use crate::models::PageRequest;

/// Descriptive fields of a trip, used both to create and to update one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripDetails {
    /// Region the trip takes place in
    pub region_id: u64,
    /// Title of the trip
    pub title: String,
    /// First calendar day
    pub start_date: Date,
    /// Last calendar day (inclusive)
    pub end_date: Date,
}

/// Parameters for updating a trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateTrip {
    /// The trip to update
    pub trip_id: u64,
    /// Replacement details
    #[serde(flatten)]
    pub details: TripDetails,
}

/// Parameters for listing the actor's trips.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListTrips {
    #[serde(flatten)]
    pub page: PageRequest,
}

/// Parameters for creating a trip day.
///
/// Without `day_no` the day is appended after the current last day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTripDay {
    pub trip_id: u64,
    /// Position to insert at (1-based); later days shift back by one
    pub day_no: Option<u32>,
    pub memo: Option<String>,
}

/// Addresses one day of a trip by position.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DayRef {
    pub trip_id: u64,
    pub day_no: u32,
}

/// Parameters for listing the days of a trip.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListTripDays {
    pub trip_id: u64,
    #[serde(flatten)]
    pub page: PageRequest,
}

/// Parameters for replacing a day's memo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTripDay {
    pub trip_id: u64,
    pub day_no: u32,
    /// New memo; `None` clears it
    pub memo: Option<String>,
}

/// Parameters for moving a day to another position.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReorderTripDay {
    pub trip_id: u64,
    /// Current position of the day
    pub old_day_no: u32,
    /// Position the day should end up at
    pub new_day_no: u32,
}

/// Descriptive fields of a schedule item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemDetails {
    pub place_id: Option<u64>,
    pub visit_time: Option<DateTime>,
    pub memo: Option<String>,
}

/// Parameters for creating a schedule item.
///
/// Without `seq_no` the item is appended after the day's current last item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateScheduleItem {
    pub trip_id: u64,
    pub day_no: u32,
    /// Position to insert at (1-based); later items shift back by one
    pub seq_no: Option<u32>,
    #[serde(flatten)]
    pub details: ItemDetails,
}

/// Addresses one schedule item through the path it was requested under.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ItemRef {
    pub trip_id: u64,
    pub day_no: u32,
    pub item_id: u64,
}

/// Parameters for listing the items of a day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListScheduleItems {
    pub trip_id: u64,
    pub day_no: u32,
    #[serde(flatten)]
    pub page: PageRequest,
}

/// Parameters for a partial schedule item update.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScheduleItem {
    pub trip_id: u64,
    pub day_no: u32,
    pub item_id: u64,
    pub visit_time: Option<DateTime>,
    pub memo: Option<String>,
}

impl UpdateScheduleItem {
    /// True when the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.visit_time.is_none() && self.memo.is_none()
    }
}

/// Parameters for moving one schedule item within its day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReorderScheduleItem {
    pub trip_id: u64,
    pub day_no: u32,
    pub item_id: u64,
    /// Target position; clamped into the day's current range
    pub new_seq_no: u32,
}

/// Parameters for browsing the region catalog.
///
/// With a `query` the regions of every country whose name contains it are
/// returned. Without one, every region of `country_code`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListRegions {
    #[serde(default = "default_country_code")]
    pub country_code: String,
    pub query: Option<String>,
}

impl Default for ListRegions {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            query: None,
        }
    }
}

fn default_country_code() -> String {
    crate::catalog::DEFAULT_COUNTRY_CODE.to_string()
}

/// A place picked from an external search result, to be saved locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaceDetails {
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// Provider-side identifier; saving the same reference twice returns the
    /// existing place
    pub external_ref: String,
}
