//! Schedule item operations for the Itinerary.

use super::Itinerary;
use crate::{
    error::Result,
    models::{Page, ScheduleItem},
    params::{
        CreateScheduleItem, DayRef, ItemRef, ListScheduleItems, ReorderScheduleItem,
        UpdateScheduleItem,
    },
    sequencer::ItemSequencer,
};

impl Itinerary {
    /// Inserts an item at the requested position of a day, or appends it.
    pub async fn create_schedule_item(
        &self,
        actor_id: u64,
        params: &CreateScheduleItem,
    ) -> Result<ScheduleItem> {
        let params = params.clone();
        self.with_database(move |db| ItemSequencer::new(db).create(actor_id, &params))
            .await
    }

    pub async fn list_schedule_items(
        &self,
        actor_id: u64,
        params: &ListScheduleItems,
    ) -> Result<Page<ScheduleItem>> {
        let params = *params;
        self.with_database(move |db| ItemSequencer::new(db).list(actor_id, &params))
            .await
    }

    /// Every item of a day, without pagination.
    pub async fn list_all_schedule_items(
        &self,
        actor_id: u64,
        params: &DayRef,
    ) -> Result<Vec<ScheduleItem>> {
        let params = *params;
        self.with_database(move |db| ItemSequencer::new(db).list_all(actor_id, &params))
            .await
    }

    pub async fn get_schedule_item(&self, actor_id: u64, params: &ItemRef) -> Result<ScheduleItem> {
        let params = *params;
        self.with_database(move |db| ItemSequencer::new(db).get(actor_id, &params))
            .await
    }

    pub async fn update_schedule_item(
        &self,
        actor_id: u64,
        params: &UpdateScheduleItem,
    ) -> Result<ScheduleItem> {
        let params = params.clone();
        self.with_database(move |db| ItemSequencer::new(db).update(actor_id, &params))
            .await
    }

    /// Deletes an item; later items of the day move up by one.
    pub async fn delete_schedule_item(&self, actor_id: u64, params: &ItemRef) -> Result<()> {
        let params = *params;
        self.with_database(move |db| ItemSequencer::new(db).delete(actor_id, &params))
            .await
    }

    /// Moves an item within its day and returns the day's items in their new
    /// order.
    pub async fn reorder_schedule_item(
        &self,
        actor_id: u64,
        params: &ReorderScheduleItem,
    ) -> Result<Vec<ScheduleItem>> {
        let params = *params;
        self.with_database(move |db| ItemSequencer::new(db).reorder(actor_id, &params))
            .await
    }
}
