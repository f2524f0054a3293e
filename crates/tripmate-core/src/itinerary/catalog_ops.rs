//! Region and place operations for the Itinerary.

use super::Itinerary;
use crate::{
    catalog::Catalog,
    error::Result,
    models::{Place, Region},
    params::{ListRegions, PlaceDetails},
};

impl Itinerary {
    /// Lists the regions of a country, or searches every region by name.
    pub async fn list_regions(&self, params: &ListRegions) -> Result<Vec<Region>> {
        let params = params.clone();
        self.with_database(move |db| Catalog::new(db).regions(&params))
            .await
    }

    /// Saves a place from a search result so schedule items can refer to it.
    pub async fn save_place(&self, details: &PlaceDetails) -> Result<Place> {
        let details = details.clone();
        self.with_database(move |db| Catalog::new(db).save_place(&details))
            .await
    }

    pub async fn get_place(&self, place_id: u64) -> Result<Place> {
        self.with_database(move |db| Catalog::new(db).place(place_id))
            .await
    }
}
