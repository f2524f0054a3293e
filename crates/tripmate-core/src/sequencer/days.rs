//! Trip day sequencing.

use log::debug;

use super::{in_transaction, resolve_insert_position};
use crate::{
    error::{Result, TripmateError},
    guard,
    models::{Page, TripDay},
    params::{CreateTripDay, DayRef, ListTripDays, ReorderTripDay, UpdateTripDay},
    store::{Parent, Store},
};

/// Keeps `day_no` dense within each trip.
pub struct DaySequencer<'s, S: Store + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: Store + ?Sized> DaySequencer<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Inserts a day at `params.day_no`, or after the last day when absent.
    /// Days at or after the target move back by one.
    pub fn create(&mut self, actor_id: u64, params: &CreateTripDay) -> Result<TripDay> {
        in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, params.trip_id, actor_id)?;

            let parent = Parent::Trip(params.trip_id);
            store.lock_parent(parent)?;
            let max = store.max_ordinal(parent)?;
            let target = resolve_insert_position(parent, params.day_no, max)?;

            if target <= max {
                store.shift_up_from(parent, target)?;
            }
            debug!("Inserting day {target} into {parent}");
            store.insert_day_at(params.trip_id, target, params.memo.as_deref())
        })
    }

    /// Creates days `1..=day_count` for a trip that has none.
    ///
    /// Runs inside the caller's transaction so the days appear together with
    /// whatever else the caller writes.
    pub fn bulk_create(&mut self, trip_id: u64, day_count: u32) -> Result<Vec<TripDay>> {
        let parent = Parent::Trip(trip_id);
        self.store.lock_parent(parent)?;

        if self.store.max_ordinal(parent)? != 0 {
            return Err(TripmateError::invalid_input(
                "day_no",
                format!("{parent} already has days"),
            ));
        }

        debug!("Creating {day_count} days for {parent}");
        (1..=day_count)
            .map(|day_no| self.store.insert_day_at(trip_id, day_no, None))
            .collect()
    }

    pub fn get(&self, actor_id: u64, params: &DayRef) -> Result<TripDay> {
        guard::authorize(&*self.store, params.trip_id, actor_id)?;
        find_day(&*self.store, params.trip_id, params.day_no)
    }

    /// Days of the trip in `day_no` order.
    pub fn list(&self, actor_id: u64, params: &ListTripDays) -> Result<Page<TripDay>> {
        params.page.validate()?;
        guard::authorize(&*self.store, params.trip_id, actor_id)?;
        self.store.list_trip_days(params.trip_id, params.page)
    }

    /// Replaces the memo of a day. Positions are untouched.
    pub fn update_memo(&mut self, actor_id: u64, params: &UpdateTripDay) -> Result<TripDay> {
        in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, params.trip_id, actor_id)?;

            let day = find_day(&*store, params.trip_id, params.day_no)?;
            store.update_trip_day_memo(day.id, params.memo.as_deref())?;
            find_day(&*store, params.trip_id, params.day_no)
        })
    }

    /// Deletes a day with its schedule items and closes the gap it leaves.
    pub fn delete(&mut self, actor_id: u64, params: &DayRef) -> Result<()> {
        in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, params.trip_id, actor_id)?;

            let parent = Parent::Trip(params.trip_id);
            store.lock_parent(parent)?;

            if !store.delete_at(parent, params.day_no)? {
                return Err(TripmateError::TripDayNotFound {
                    trip_id: params.trip_id,
                    day_no: params.day_no,
                });
            }
            debug!("Deleted day {} of {parent}", params.day_no);
            store.shift_down_after(parent, params.day_no)
        })
    }

    /// Moves a day to `new_day_no` and returns every day of the trip in its
    /// new order.
    ///
    /// The moved day's schedule items keep their time of day but move to the
    /// calendar date of the new position.
    pub fn reorder(&mut self, actor_id: u64, params: &ReorderTripDay) -> Result<Vec<TripDay>> {
        in_transaction(&mut *self.store, |store| {
            guard::authorize(&*store, params.trip_id, actor_id)?;

            let parent = Parent::Trip(params.trip_id);
            store.lock_parent(parent)?;

            let (old, new) = (params.old_day_no, params.new_day_no);
            if old == new {
                return store.trip_days(params.trip_id);
            }

            let day = find_day(&*store, params.trip_id, old)?;
            let max = store.max_ordinal(parent)?;
            if new < 1 || new > max {
                return Err(TripmateError::InvalidPosition {
                    parent,
                    position: new,
                    max,
                });
            }

            store.move_via_range(parent, old, new, day.id)?;
            store.offset_visit_times(day.id, i64::from(new) - i64::from(old))?;
            debug!("Moved day {old} of {parent} to {new}");

            store.trip_days(params.trip_id)
        })
    }
}

pub(crate) fn find_day<S: Store + ?Sized>(store: &S, trip_id: u64, day_no: u32) -> Result<TripDay> {
    store
        .find_trip_day(trip_id, day_no)?
        .ok_or(TripmateError::TripDayNotFound { trip_id, day_no })
}
