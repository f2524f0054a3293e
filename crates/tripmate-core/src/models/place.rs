//! Place model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A place saved into the local catalog from an external search result.
///
/// Schedule items point at places by id. A place is identified upstream by
/// its `external_ref`, so saving the same result twice yields the same row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    /// Unique identifier for the place
    pub id: u64,

    /// Name of the place
    pub name: String,

    /// Free-form category label (cafe, museum, ...)
    pub category: Option<String>,

    /// Postal address
    pub address: Option<String>,

    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,

    /// Identifier of the place at the search provider it came from
    pub external_ref: String,

    /// Timestamp when the place was first saved (UTC)
    pub created_at: Timestamp,
}
