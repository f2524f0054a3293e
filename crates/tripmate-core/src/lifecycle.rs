//! Trip creation, update and removal.
//!
//! A trip always has one day per calendar date between its start and end
//! date, inclusive. Creating a trip creates those days, and changing the date
//! range replaces them.

use jiff::civil::Date;
use log::info;

use crate::{
    catalog,
    error::{Result, TripmateError},
    guard,
    models::{Page, Trip},
    params::{ListTrips, TripDetails, UpdateTrip},
    sequencer::{in_transaction, DaySequencer},
    store::{Parent, Store},
};

/// Number of calendar dates from `start` to `end`, both included.
///
/// # Errors
///
/// `InvalidInput` when `start` is after `end`.
pub fn inclusive_days(start: Date, end: Date) -> Result<u32> {
    if start > end {
        return Err(TripmateError::invalid_input(
            "end_date",
            format!("End date {end} is before start date {start}"),
        ));
    }

    let span = start
        .until(end)
        .map_err(|e| TripmateError::invalid_input("end_date", e.to_string()))?;
    u32::try_from(span.get_days() + 1)
        .map_err(|e| TripmateError::invalid_input("end_date", e.to_string()))
}

/// Trip-level operations.
pub struct TripLifecycle<'s, S: Store + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: Store + ?Sized> TripLifecycle<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Creates a trip owned by `actor_id` together with its days.
    ///
    /// The region must exist in the catalog, otherwise `InvalidInput`.
    pub fn create(&mut self, actor_id: u64, details: &TripDetails) -> Result<Trip> {
        let day_count = inclusive_days(details.start_date, details.end_date)?;

        let trip = in_transaction(&mut *self.store, |store| {
            catalog::require_region(&*store, details.region_id)?;
            let trip = store.insert_trip(actor_id, details)?;
            DaySequencer::new(&mut *store).bulk_create(trip.id, day_count)?;
            Ok(Trip { day_count, ..trip })
        })?;

        info!(
            "Created trip {} with {} days for owner {actor_id}",
            trip.id, trip.day_count
        );
        Ok(trip)
    }

    pub fn get(&self, actor_id: u64, trip_id: u64) -> Result<Trip> {
        guard::authorize(&*self.store, trip_id, actor_id)?;
        self.store
            .find_trip(trip_id)?
            .ok_or(TripmateError::TripNotFound { id: trip_id })
    }

    /// The actor's trips, newest first.
    pub fn list(&self, actor_id: u64, params: &ListTrips) -> Result<Page<Trip>> {
        params.page.validate()?;
        self.store.list_trips(actor_id, params.page)
    }

    /// Replaces the trip's details.
    ///
    /// Days and their items survive a change of title or region. A change of
    /// date range discards them and creates a fresh set of empty days.
    pub fn update(&mut self, actor_id: u64, params: &UpdateTrip) -> Result<Trip> {
        let details = &params.details;
        let day_count = inclusive_days(details.start_date, details.end_date)?;

        let trip = in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, params.trip_id, actor_id)?;
            store.lock_parent(Parent::Trip(params.trip_id))?;
            catalog::require_region(&*store, details.region_id)?;

            let current = store
                .find_trip(params.trip_id)?
                .ok_or(TripmateError::TripNotFound { id: params.trip_id })?;
            if !store.update_trip(params.trip_id, details)? {
                return Err(TripmateError::TripNotFound { id: params.trip_id });
            }

            let dates_changed = current.start_date != details.start_date
                || current.end_date != details.end_date;
            if dates_changed {
                store.delete_trip_days(params.trip_id)?;
                DaySequencer::new(&mut *store).bulk_create(params.trip_id, day_count)?;
                info!(
                    "Rebuilt trip {} with {day_count} days for {} to {}",
                    params.trip_id, details.start_date, details.end_date
                );
            }

            store
                .find_trip(params.trip_id)?
                .ok_or(TripmateError::TripNotFound { id: params.trip_id })
        })?;

        Ok(trip)
    }

    /// Deletes the trip with all of its days and items.
    pub fn delete(&mut self, actor_id: u64, trip_id: u64) -> Result<()> {
        in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, trip_id, actor_id)?;
            store.lock_parent(Parent::Trip(trip_id))?;
            store.delete_trip(trip_id)
        })?;

        info!("Deleted trip {trip_id}");
        Ok(())
    }
}
