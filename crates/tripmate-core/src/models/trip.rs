//! Trip model definition and related functionality.

use jiff::{civil::Date, Span, Timestamp};
use serde::{Deserialize, Serialize};

/// A trip owned by a single actor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    /// Unique identifier for the trip
    pub id: u64,

    /// Actor that owns the trip
    pub owner_id: u64,

    /// Region the trip takes place in
    pub region_id: u64,

    /// Title of the trip
    pub title: String,

    /// First calendar day of the trip
    pub start_date: Date,

    /// Last calendar day of the trip (inclusive)
    pub end_date: Date,

    /// Number of days currently attached to the trip, counted from the
    /// trip's day rows
    pub day_count: u32,

    /// Timestamp when the trip was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the trip was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Trip {
    /// Calendar date that day `day_no` falls on, counting from the start
    /// date. Returns `None` for day 0 or when the date would overflow.
    pub fn day_date(&self, day_no: u32) -> Option<Date> {
        let offset = day_no.checked_sub(1)?;
        self.start_date
            .checked_add(Span::new().try_days(i64::from(offset)).ok()?)
            .ok()
    }
}
