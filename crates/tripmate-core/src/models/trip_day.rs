//! Trip day model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One day of a trip, positioned by `day_no`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripDay {
    /// Unique identifier for the day
    pub id: u64,

    /// ID of the owning trip
    pub trip_id: u64,

    /// Position of the day within the trip (1-based, dense)
    pub day_no: u32,

    /// Free-form note attached to the day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,

    /// Timestamp when the day was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the day was last updated (UTC)
    pub updated_at: Timestamp,
}
