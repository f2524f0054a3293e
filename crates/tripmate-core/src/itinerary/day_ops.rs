//! Trip day operations for the Itinerary.

use super::Itinerary;
use crate::{
    error::Result,
    models::{Page, TripDay},
    params::{CreateTripDay, DayRef, ListTripDays, ReorderTripDay, UpdateTripDay},
    sequencer::DaySequencer,
};

impl Itinerary {
    /// Inserts a day at the requested position, or appends it.
    pub async fn create_trip_day(&self, actor_id: u64, params: &CreateTripDay) -> Result<TripDay> {
        let params = params.clone();
        self.with_database(move |db| DaySequencer::new(db).create(actor_id, &params))
            .await
    }

    pub async fn get_trip_day(&self, actor_id: u64, params: &DayRef) -> Result<TripDay> {
        let params = *params;
        self.with_database(move |db| DaySequencer::new(db).get(actor_id, &params))
            .await
    }

    pub async fn list_trip_days(
        &self,
        actor_id: u64,
        params: &ListTripDays,
    ) -> Result<Page<TripDay>> {
        let params = *params;
        self.with_database(move |db| DaySequencer::new(db).list(actor_id, &params))
            .await
    }

    pub async fn update_trip_day(&self, actor_id: u64, params: &UpdateTripDay) -> Result<TripDay> {
        let params = params.clone();
        self.with_database(move |db| DaySequencer::new(db).update_memo(actor_id, &params))
            .await
    }

    /// Deletes a day with its schedule items; later days move up by one.
    pub async fn delete_trip_day(&self, actor_id: u64, params: &DayRef) -> Result<()> {
        let params = *params;
        self.with_database(move |db| DaySequencer::new(db).delete(actor_id, &params))
            .await
    }

    /// Moves a day and returns the trip's days in their new order.
    pub async fn reorder_trip_day(
        &self,
        actor_id: u64,
        params: &ReorderTripDay,
    ) -> Result<Vec<TripDay>> {
        let params = *params;
        self.with_database(move |db| DaySequencer::new(db).reorder(actor_id, &params))
            .await
    }
}
