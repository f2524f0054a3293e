//! Schedule item model definition.

use jiff::{civil::DateTime, Timestamp};
use serde::{Deserialize, Serialize};

/// A single visit planned within a trip day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleItem {
    /// Unique identifier for the item
    pub id: u64,

    /// ID of the owning trip day
    pub trip_day_id: u64,

    /// Position of the item within its day (1-based, dense)
    pub seq_no: u32,

    /// Place being visited, if one was picked
    pub place_id: Option<u64>,

    /// Planned local visit time
    pub visit_time: Option<DateTime>,

    /// Free-form note attached to the item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,

    /// Timestamp when the item was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the item was last updated (UTC)
    pub updated_at: Timestamp,
}
