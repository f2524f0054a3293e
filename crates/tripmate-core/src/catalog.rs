//! Region and place catalog.
//!
//! Regions are a fixed list seeded into every new store. Places are saved on
//! demand from external search results and deduplicated by their provider
//! reference. Trips name a region and schedule items may name a place; both
//! references are checked here before a row is written, so a dangling id is
//! reported as invalid input instead of surfacing as a storage failure.

use log::info;

use crate::{
    error::{Result, TripmateError},
    models::{Place, Region},
    params::{ListRegions, PlaceDetails},
    sequencer::in_transaction,
    store::Store,
};

/// Country whose regions are listed when the caller names none.
pub const DEFAULT_COUNTRY_CODE: &str = "KR";

/// Regions present in every new store. Region `n` is the `n`th entry.
pub const SEEDED_REGIONS: [&str; 17] = [
    "Seoul",
    "Busan",
    "Daegu",
    "Incheon",
    "Gwangju",
    "Daejeon",
    "Ulsan",
    "Sejong",
    "Gyeonggi-do",
    "Gangwon-do",
    "Chungcheongbuk-do",
    "Chungcheongnam-do",
    "Jeonbuk-do",
    "Jeollanam-do",
    "Gyeongsangbuk-do",
    "Gyeongsangnam-do",
    "Jeju-do",
];

/// The seeded regions with their ids.
pub fn seeded_regions() -> impl Iterator<Item = Region> {
    SEEDED_REGIONS
        .iter()
        .zip(1_u64..)
        .map(|(name, id)| Region {
            id,
            name: (*name).to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        })
}

/// Fails with `InvalidInput` unless `region_id` names a catalog region.
pub(crate) fn require_region<S: Store + ?Sized>(store: &S, region_id: u64) -> Result<()> {
    match store.find_region(region_id)? {
        Some(_) => Ok(()),
        None => Err(TripmateError::invalid_input(
            "region_id",
            format!("Region {region_id} does not exist"),
        )),
    }
}

/// Fails with `InvalidInput` unless `place_id` is absent or names a saved
/// place.
pub(crate) fn require_place<S: Store + ?Sized>(store: &S, place_id: Option<u64>) -> Result<()> {
    let Some(place_id) = place_id else {
        return Ok(());
    };
    match store.find_place(place_id)? {
        Some(_) => Ok(()),
        None => Err(TripmateError::invalid_input(
            "place_id",
            format!("Place {place_id} does not exist"),
        )),
    }
}

fn validate_place(details: &PlaceDetails) -> Result<()> {
    if details.name.trim().is_empty() {
        return Err(TripmateError::invalid_input("name", "Place name is empty"));
    }
    if details.external_ref.trim().is_empty() {
        return Err(TripmateError::invalid_input(
            "external_ref",
            "External reference is empty",
        ));
    }
    if !(-90.0..=90.0).contains(&details.lat) {
        return Err(TripmateError::invalid_input(
            "lat",
            format!("Latitude {} is outside -90..=90", details.lat),
        ));
    }
    if !(-180.0..=180.0).contains(&details.lng) {
        return Err(TripmateError::invalid_input(
            "lng",
            format!("Longitude {} is outside -180..=180", details.lng),
        ));
    }
    Ok(())
}

/// Catalog operations. The catalog is shared, so none of them take an actor.
pub struct Catalog<'s, S: Store + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: Store + ?Sized> Catalog<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    pub fn regions(&self, params: &ListRegions) -> Result<Vec<Region>> {
        let query = params
            .query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty());
        self.store.list_regions(&params.country_code, query)
    }

    /// Saves a place picked from a search result, or returns the place already
    /// saved under the same external reference.
    pub fn save_place(&mut self, details: &PlaceDetails) -> Result<Place> {
        validate_place(details)?;
        let place = in_transaction(&mut *self.store, |store| store.upsert_place(details))?;
        info!("Saved place {} ({})", place.id, place.external_ref);
        Ok(place)
    }

    pub fn place(&self, place_id: u64) -> Result<Place> {
        self.store
            .find_place(place_id)?
            .ok_or(TripmateError::PlaceNotFound { id: place_id })
    }
}
