//! Region catalog entries.

use serde::{Deserialize, Serialize};

/// A region a trip can be planned in.
///
/// Regions are seeded when the store is created and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub id: u64,

    /// Display name of the region
    pub name: String,

    /// ISO 3166-1 alpha-2 code of the country the region belongs to
    pub country_code: String,
}
