//! Schedule item sequencing.
//!
//! Every call names the item's day by `(trip_id, day_no)`. Items are looked up
//! by id and must belong to that day; an item filed under another day is a
//! `Mismatch`, never silently used.

use log::debug;

use super::{days::find_day, in_transaction, resolve_insert_position};
use crate::{
    catalog,
    error::{Result, TripmateError},
    guard,
    models::{Page, ScheduleItem, TripDay},
    params::{
        CreateScheduleItem, DayRef, ItemRef, ListScheduleItems, ReorderScheduleItem,
        UpdateScheduleItem,
    },
    store::{Parent, Store},
};

/// Keeps `seq_no` dense within each trip day.
pub struct ItemSequencer<'s, S: Store + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: Store + ?Sized> ItemSequencer<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Inserts an item at `params.seq_no`, or after the day's last item when
    /// absent. Items at or after the target move back by one.
    ///
    /// A `place_id` must name a saved place, otherwise `InvalidInput`.
    pub fn create(&mut self, actor_id: u64, params: &CreateScheduleItem) -> Result<ScheduleItem> {
        in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, params.trip_id, actor_id)?;
            catalog::require_place(&*store, params.details.place_id)?;
            let day = lock_day(&mut *store, params.trip_id, params.day_no)?;

            let parent = Parent::TripDay(day.id);
            store.lock_parent(parent)?;
            let max = store.max_ordinal(parent)?;
            let target = resolve_insert_position(parent, params.seq_no, max)?;

            if target <= max {
                store.shift_up_from(parent, target)?;
            }
            debug!("Inserting item {target} into {parent}");
            store.insert_item_at(day.id, target, &params.details)
        })
    }

    /// One page of the day's items in `seq_no` order.
    pub fn list(&self, actor_id: u64, params: &ListScheduleItems) -> Result<Page<ScheduleItem>> {
        params.page.validate()?;
        guard::authorize(&*self.store, params.trip_id, actor_id)?;
        let day = find_day(&*self.store, params.trip_id, params.day_no)?;
        self.store.list_schedule_items(day.id, params.page)
    }

    /// Every item of the day in `seq_no` order.
    pub fn list_all(&self, actor_id: u64, params: &DayRef) -> Result<Vec<ScheduleItem>> {
        guard::authorize(&*self.store, params.trip_id, actor_id)?;
        let day = find_day(&*self.store, params.trip_id, params.day_no)?;
        self.store.schedule_items(day.id)
    }

    pub fn get(&self, actor_id: u64, params: &ItemRef) -> Result<ScheduleItem> {
        guard::authorize(&*self.store, params.trip_id, actor_id)?;
        let day = find_day(&*self.store, params.trip_id, params.day_no)?;
        find_item_in_day(&*self.store, &day, params.item_id)
    }

    /// Changes the visit time and/or memo. Position and place stay as they
    /// are.
    pub fn update(&mut self, actor_id: u64, params: &UpdateScheduleItem) -> Result<ScheduleItem> {
        in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, params.trip_id, actor_id)?;
            let day = find_day(&*store, params.trip_id, params.day_no)?;
            let item = find_item_in_day(&*store, &day, params.item_id)?;

            if params.is_empty() {
                return Ok(item);
            }
            store.update_schedule_item(item.id, params.visit_time, params.memo.as_deref())?;
            find_item_in_day(&*store, &day, item.id)
        })
    }

    /// Deletes an item and closes the gap it leaves.
    pub fn delete(&mut self, actor_id: u64, params: &ItemRef) -> Result<()> {
        in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, params.trip_id, actor_id)?;
            let day = lock_day(&mut *store, params.trip_id, params.day_no)?;

            let parent = Parent::TripDay(day.id);
            store.lock_parent(parent)?;
            let item = find_item_in_day(&*store, &day, params.item_id)?;

            if !store.delete_at(parent, item.seq_no)? {
                return Err(TripmateError::ScheduleItemNotFound { id: item.id });
            }
            debug!("Deleted item {} of {parent}", item.seq_no);
            store.shift_down_after(parent, item.seq_no)
        })
    }

    /// Moves an item within its day and returns every item of the day in its
    /// new order.
    ///
    /// `new_seq_no` is clamped into `1..=max`, so 0 moves the item to the
    /// front and anything past the end moves it to the back.
    pub fn reorder(
        &mut self,
        actor_id: u64,
        params: &ReorderScheduleItem,
    ) -> Result<Vec<ScheduleItem>> {
        in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, params.trip_id, actor_id)?;
            let day = lock_day(&mut *store, params.trip_id, params.day_no)?;

            let parent = Parent::TripDay(day.id);
            store.lock_parent(parent)?;
            let item = find_item_in_day(&*store, &day, params.item_id)?;

            let max = store.max_ordinal(parent)?;
            let new = params.new_seq_no.clamp(1, max.max(1));
            if new != item.seq_no {
                store.move_via_range(parent, item.seq_no, new, item.id)?;
                debug!("Moved item {} of {parent} to {new}", item.seq_no);
            }

            store.schedule_items(day.id)
        })
    }
}

/// Locks the trip, then resolves `day_no` under that lock so a concurrent day
/// reorder cannot hand back a different day.
fn lock_day<S: Store + ?Sized>(store: &mut S, trip_id: u64, day_no: u32) -> Result<TripDay> {
    store.lock_parent(Parent::Trip(trip_id))?;
    find_day(&*store, trip_id, day_no)
}

fn find_item_in_day<S: Store + ?Sized>(
    store: &S,
    day: &TripDay,
    item_id: u64,
) -> Result<ScheduleItem> {
    let item = store
        .find_schedule_item(item_id)?
        .ok_or(TripmateError::ScheduleItemNotFound { id: item_id })?;

    if item.trip_day_id != day.id {
        return Err(TripmateError::Mismatch {
            item_id,
            trip_day_id: day.id,
        });
    }
    Ok(item)
}
