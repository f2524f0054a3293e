//! Trip operations for the Itinerary.

use super::Itinerary;
use crate::{
    error::Result,
    lifecycle::TripLifecycle,
    models::{Page, Trip},
    params::{ListTrips, TripDetails, UpdateTrip},
};

impl Itinerary {
    /// Creates a trip owned by `actor_id` with one day per calendar date.
    pub async fn create_trip(&self, actor_id: u64, details: &TripDetails) -> Result<Trip> {
        let details = details.clone();
        self.with_database(move |db| TripLifecycle::new(db).create(actor_id, &details))
            .await
    }

    pub async fn get_trip(&self, actor_id: u64, trip_id: u64) -> Result<Trip> {
        self.with_database(move |db| TripLifecycle::new(db).get(actor_id, trip_id))
            .await
    }

    /// Lists the actor's own trips, newest first.
    pub async fn list_trips(&self, actor_id: u64, params: &ListTrips) -> Result<Page<Trip>> {
        let params = *params;
        self.with_database(move |db| TripLifecycle::new(db).list(actor_id, &params))
            .await
    }

    /// Replaces a trip's details. Changing the dates recreates its days.
    pub async fn update_trip(&self, actor_id: u64, params: &UpdateTrip) -> Result<Trip> {
        let params = params.clone();
        self.with_database(move |db| TripLifecycle::new(db).update(actor_id, &params))
            .await
    }

    /// Deletes a trip with its days and schedule items.
    pub async fn delete_trip(&self, actor_id: u64, trip_id: u64) -> Result<()> {
        self.with_database(move |db| TripLifecycle::new(db).delete(actor_id, trip_id))
            .await
    }
}
