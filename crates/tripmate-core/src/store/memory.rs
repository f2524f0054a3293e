//! In-memory [`Store`](super::Store) adapter.
//!
//! Handles created with [`MemoryStore::new`] and their clones share one set of
//! committed tables. A transaction works on a private copy of the tables and
//! publishes it on commit, so a rollback simply drops the copy. Only one
//! transaction can be open across all handles at a time: `begin` waits for the
//! current writer to finish, up to the configured lock timeout, which gives the
//! same serialization as SQLite's `BEGIN IMMEDIATE`.
//!
//! Ordinal updates are applied row by row and every row checks the
//! `(parent, ordinal)` uniqueness rule, so an incorrectly ordered shift fails
//! here the same way it would against a database constraint.

use std::{
    collections::BTreeMap,
    sync::{Arc, Condvar, Mutex, MutexGuard},
    time::Duration,
};

use jiff::{civil::DateTime, Span, Timestamp};

use super::{
    CatalogRecords, DayRecords, ItemRecords, OrdinalStore, Parent, Transactional, TripRecords,
    STAGING_OFFSET,
};
use crate::{
    catalog,
    error::{Result, TripmateError},
    models::{Page, PageRequest, Place, Region, ScheduleItem, Trip, TripDay},
    params::{ItemDetails, PlaceDetails, TripDetails},
};

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
struct Tables {
    last_id: u64,
    trips: BTreeMap<u64, Trip>,
    days: BTreeMap<u64, TripDay>,
    items: BTreeMap<u64, ScheduleItem>,
    regions: BTreeMap<u64, Region>,
    places: BTreeMap<u64, Place>,
}

#[derive(Debug)]
struct Shared {
    committed: Mutex<Tables>,
    writer_active: Mutex<bool>,
    writer_released: Condvar,
    lock_timeout: Duration,
}

/// Handle onto a shared in-memory database.
#[derive(Debug)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    working: Option<Tables>,
}

fn poisoned<T>(_: T) -> TripmateError {
    TripmateError::storage("memory store lock poisoned")
}

fn no_transaction() -> TripmateError {
    TripmateError::storage("no open transaction")
}

impl MemoryStore {
    /// Creates an empty store with the default lock timeout.
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    /// Creates an empty store whose `begin` gives up after `lock_timeout`.
    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                committed: Mutex::new(Tables::seeded()),
                writer_active: Mutex::new(false),
                writer_released: Condvar::new(),
                lock_timeout,
            }),
            working: None,
        }
    }

    fn committed(&self) -> Result<MutexGuard<'_, Tables>> {
        self.shared.committed.lock().map_err(poisoned)
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T> {
        match &self.working {
            Some(tables) => Ok(f(tables)),
            None => {
                let tables = self.committed()?;
                Ok(f(&tables))
            }
        }
    }

    fn write<T>(&mut self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let tables = self.working.as_mut().ok_or_else(no_transaction)?;
        f(tables)
    }

    fn release_writer(&self) {
        if let Ok(mut active) = self.shared.writer_active.lock() {
            *active = false;
        }
        self.shared.writer_released.notify_one();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStore {
    /// Returns a new handle onto the same tables, outside any transaction.
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            working: None,
        }
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        if self.working.take().is_some() {
            self.release_writer();
        }
    }
}

fn foreign_key_failed() -> TripmateError {
    TripmateError::storage("FOREIGN KEY constraint failed")
}

impl Tables {
    fn seeded() -> Self {
        Self {
            regions: catalog::seeded_regions()
                .map(|region| (region.id, region))
                .collect(),
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn parent_exists(&self, parent: Parent) -> bool {
        match parent {
            Parent::Trip(id) => self.trips.contains_key(&id),
            Parent::TripDay(id) => self.days.contains_key(&id),
        }
    }

    /// `(child id, ordinal)` pairs under `parent`, lowest ordinal first.
    fn children(&self, parent: Parent) -> Vec<(u64, u32)> {
        let mut children: Vec<(u64, u32)> = match parent {
            Parent::Trip(trip_id) => self
                .days
                .values()
                .filter(|day| day.trip_id == trip_id)
                .map(|day| (day.id, day.day_no))
                .collect(),
            Parent::TripDay(trip_day_id) => self
                .items
                .values()
                .filter(|item| item.trip_day_id == trip_day_id)
                .map(|item| (item.id, item.seq_no))
                .collect(),
        };
        children.sort_by_key(|&(_, ordinal)| ordinal);
        children
    }

    fn max_ordinal(&self, parent: Parent) -> u32 {
        self.children(parent)
            .last()
            .map_or(0, |&(_, ordinal)| ordinal)
    }

    fn child_at(&self, parent: Parent, ordinal: u32) -> Option<u64> {
        self.children(parent)
            .into_iter()
            .find(|&(_, candidate)| candidate == ordinal)
            .map(|(id, _)| id)
    }

    fn ensure_free(&self, parent: Parent, ordinal: u32, except: Option<u64>) -> Result<()> {
        let taken = self
            .children(parent)
            .into_iter()
            .any(|(id, candidate)| candidate == ordinal && Some(id) != except);
        if taken {
            let constraint = match parent {
                Parent::Trip(_) => "trip_days.trip_id, trip_days.day_no",
                Parent::TripDay(_) => "schedule_items.trip_day_id, schedule_items.seq_no",
            };
            return Err(TripmateError::storage(format!(
                "UNIQUE constraint failed: {constraint}"
            )));
        }
        Ok(())
    }

    /// Updates one child's ordinal, enforcing per-row uniqueness.
    fn set_ordinal(&mut self, parent: Parent, id: u64, ordinal: u32) -> Result<()> {
        self.ensure_free(parent, ordinal, Some(id))?;
        let now = Timestamp::now();
        match parent {
            Parent::Trip(_) => {
                if let Some(day) = self.days.get_mut(&id) {
                    day.day_no = ordinal;
                    day.updated_at = now;
                }
            }
            Parent::TripDay(_) => {
                if let Some(item) = self.items.get_mut(&id) {
                    item.seq_no = ordinal;
                    item.updated_at = now;
                }
            }
        }
        Ok(())
    }

    fn with_day_count(&self, trip: &Trip) -> Trip {
        let day_count = self.days.values().filter(|day| day.trip_id == trip.id).count();
        Trip {
            day_count: u32::try_from(day_count).unwrap_or(u32::MAX),
            ..trip.clone()
        }
    }

    fn remove_days_where(&mut self, keep: impl Fn(&TripDay) -> bool) {
        let removed: Vec<u64> = self
            .days
            .values()
            .filter(|day| !keep(day))
            .map(|day| day.id)
            .collect();
        self.days.retain(|_, day| keep(day));
        self.items
            .retain(|_, item| !removed.contains(&item.trip_day_id));
    }
}

impl Transactional for MemoryStore {
    fn begin(&mut self) -> Result<()> {
        if self.working.is_some() {
            return Err(TripmateError::storage("transaction already open"));
        }

        let active = self.shared.writer_active.lock().map_err(poisoned)?;
        let (mut active, _) = self
            .shared
            .writer_released
            .wait_timeout_while(active, self.shared.lock_timeout, |active| *active)
            .map_err(poisoned)?;
        if *active {
            return Err(TripmateError::storage("lock wait timeout exceeded"));
        }
        *active = true;
        drop(active);

        let snapshot = self.committed().map(|tables| tables.clone());
        match snapshot {
            Ok(tables) => {
                self.working = Some(tables);
                Ok(())
            }
            Err(e) => {
                self.release_writer();
                Err(e)
            }
        }
    }

    fn commit(&mut self) -> Result<()> {
        let working = self.working.take().ok_or_else(no_transaction)?;
        let published = self.committed().map(|mut tables| *tables = working);
        self.release_writer();
        published
    }

    fn rollback(&mut self) -> Result<()> {
        if self.working.take().is_some() {
            self.release_writer();
        }
        Ok(())
    }
}

impl OrdinalStore for MemoryStore {
    fn lock_parent(&mut self, parent: Parent) -> Result<()> {
        let exists = self.write(|tables| Ok(tables.parent_exists(parent)))?;
        if !exists {
            return Err(TripmateError::ParentNotFound { parent });
        }
        Ok(())
    }

    fn max_ordinal(&self, parent: Parent) -> Result<u32> {
        self.read(|tables| tables.max_ordinal(parent))
    }

    fn shift_up_from(&mut self, parent: Parent, from: u32) -> Result<()> {
        self.write(|tables| {
            for (id, ordinal) in tables.children(parent).into_iter().rev() {
                if ordinal >= from {
                    tables.set_ordinal(parent, id, ordinal + 1)?;
                }
            }
            Ok(())
        })
    }

    fn shift_down_after(&mut self, parent: Parent, deleted: u32) -> Result<()> {
        self.write(|tables| {
            for (id, ordinal) in tables.children(parent) {
                if ordinal > deleted {
                    tables.set_ordinal(parent, id, ordinal - 1)?;
                }
            }
            Ok(())
        })
    }

    fn move_via_range(
        &mut self,
        parent: Parent,
        old: u32,
        new: u32,
        moving_id: u64,
    ) -> Result<()> {
        self.write(|tables| {
            if tables.child_at(parent, old) != Some(moving_id) {
                return Err(TripmateError::storage(format!(
                    "child {moving_id} is not at position {old} of {parent}"
                )));
            }

            let staged = tables.max_ordinal(parent) + STAGING_OFFSET;
            tables.set_ordinal(parent, moving_id, staged)?;

            let siblings = tables.children(parent);
            if old < new {
                for &(id, ordinal) in &siblings {
                    if id != moving_id && ordinal > old && ordinal <= new {
                        tables.set_ordinal(parent, id, ordinal - 1)?;
                    }
                }
            } else {
                for &(id, ordinal) in siblings.iter().rev() {
                    if id != moving_id && ordinal >= new && ordinal < old {
                        tables.set_ordinal(parent, id, ordinal + 1)?;
                    }
                }
            }

            tables.set_ordinal(parent, moving_id, new)
        })
    }

    fn insert_day_at(&mut self, trip_id: u64, day_no: u32, memo: Option<&str>) -> Result<TripDay> {
        self.write(|tables| {
            let parent = Parent::Trip(trip_id);
            if !tables.parent_exists(parent) {
                return Err(foreign_key_failed());
            }
            tables.ensure_free(parent, day_no, None)?;

            let now = Timestamp::now();
            let day = TripDay {
                id: tables.next_id(),
                trip_id,
                day_no,
                memo: memo.map(String::from),
                created_at: now,
                updated_at: now,
            };
            tables.days.insert(day.id, day.clone());
            Ok(day)
        })
    }

    fn insert_item_at(
        &mut self,
        trip_day_id: u64,
        seq_no: u32,
        details: &ItemDetails,
    ) -> Result<ScheduleItem> {
        self.write(|tables| {
            let parent = Parent::TripDay(trip_day_id);
            let place_missing = details
                .place_id
                .is_some_and(|place_id| !tables.places.contains_key(&place_id));
            if !tables.parent_exists(parent) || place_missing {
                return Err(foreign_key_failed());
            }
            tables.ensure_free(parent, seq_no, None)?;

            let now = Timestamp::now();
            let item = ScheduleItem {
                id: tables.next_id(),
                trip_day_id,
                seq_no,
                place_id: details.place_id,
                visit_time: details.visit_time,
                memo: details.memo.clone(),
                created_at: now,
                updated_at: now,
            };
            tables.items.insert(item.id, item.clone());
            Ok(item)
        })
    }

    fn delete_at(&mut self, parent: Parent, ordinal: u32) -> Result<bool> {
        self.write(|tables| {
            let Some(id) = tables.child_at(parent, ordinal) else {
                return Ok(false);
            };
            match parent {
                Parent::Trip(_) => tables.remove_days_where(|day| day.id != id),
                Parent::TripDay(_) => {
                    tables.items.remove(&id);
                }
            }
            Ok(true)
        })
    }
}

impl TripRecords for MemoryStore {
    fn insert_trip(&mut self, owner_id: u64, details: &TripDetails) -> Result<Trip> {
        self.write(|tables| {
            if !tables.regions.contains_key(&details.region_id) {
                return Err(foreign_key_failed());
            }
            let now = Timestamp::now();
            let trip = Trip {
                id: tables.next_id(),
                owner_id,
                region_id: details.region_id,
                title: details.title.clone(),
                start_date: details.start_date,
                end_date: details.end_date,
                day_count: 0,
                created_at: now,
                updated_at: now,
            };
            tables.trips.insert(trip.id, trip.clone());
            Ok(trip)
        })
    }

    fn update_trip(&mut self, trip_id: u64, details: &TripDetails) -> Result<bool> {
        self.write(|tables| {
            if !tables.regions.contains_key(&details.region_id) {
                return Err(foreign_key_failed());
            }
            let Some(trip) = tables.trips.get_mut(&trip_id) else {
                return Ok(false);
            };
            trip.region_id = details.region_id;
            trip.title = details.title.clone();
            trip.start_date = details.start_date;
            trip.end_date = details.end_date;
            trip.updated_at = Timestamp::now();
            Ok(true)
        })
    }

    fn delete_trip(&mut self, trip_id: u64) -> Result<()> {
        self.write(|tables| {
            tables.remove_days_where(|day| day.trip_id != trip_id);
            tables.trips.remove(&trip_id);
            Ok(())
        })
    }

    fn find_trip(&self, trip_id: u64) -> Result<Option<Trip>> {
        self.read(|tables| {
            tables
                .trips
                .get(&trip_id)
                .map(|trip| tables.with_day_count(trip))
        })
    }

    fn list_trips(&self, owner_id: u64, page: PageRequest) -> Result<Page<Trip>> {
        page.validate()?;
        self.read(|tables| {
            let mut trips: Vec<Trip> = tables
                .trips
                .values()
                .filter(|trip| trip.owner_id == owner_id)
                .map(|trip| tables.with_day_count(trip))
                .collect();
            trips.sort_by(|a, b| b.id.cmp(&a.id));
            Page::from_ordered(trips, page)
        })
    }

    fn trip_owner(&self, trip_id: u64) -> Result<Option<u64>> {
        self.read(|tables| tables.trips.get(&trip_id).map(|trip| trip.owner_id))
    }
}

impl DayRecords for MemoryStore {
    fn delete_trip_days(&mut self, trip_id: u64) -> Result<()> {
        self.write(|tables| {
            tables.remove_days_where(|day| day.trip_id != trip_id);
            Ok(())
        })
    }

    fn find_trip_day(&self, trip_id: u64, day_no: u32) -> Result<Option<TripDay>> {
        self.read(|tables| {
            tables
                .days
                .values()
                .find(|day| day.trip_id == trip_id && day.day_no == day_no)
                .cloned()
        })
    }

    fn list_trip_days(&self, trip_id: u64, page: PageRequest) -> Result<Page<TripDay>> {
        page.validate()?;
        Ok(Page::from_ordered(self.trip_days(trip_id)?, page))
    }

    fn trip_days(&self, trip_id: u64) -> Result<Vec<TripDay>> {
        self.read(|tables| {
            let mut days: Vec<TripDay> = tables
                .days
                .values()
                .filter(|day| day.trip_id == trip_id)
                .cloned()
                .collect();
            days.sort_by_key(|day| day.day_no);
            days
        })
    }

    fn update_trip_day_memo(&mut self, trip_day_id: u64, memo: Option<&str>) -> Result<()> {
        self.write(|tables| {
            if let Some(day) = tables.days.get_mut(&trip_day_id) {
                day.memo = memo.map(String::from);
                day.updated_at = Timestamp::now();
            }
            Ok(())
        })
    }
}

impl ItemRecords for MemoryStore {
    fn offset_visit_times(&mut self, trip_day_id: u64, days: i64) -> Result<()> {
        let span = Span::new()
            .try_days(days)
            .map_err(|e| TripmateError::invalid_input("visit_time", e.to_string()))?;
        self.write(|tables| {
            let now = Timestamp::now();
            for item in tables.items.values_mut() {
                if item.trip_day_id != trip_day_id {
                    continue;
                }
                if let Some(visit_time) = item.visit_time {
                    let shifted = visit_time
                        .checked_add(span)
                        .map_err(|e| TripmateError::invalid_input("visit_time", e.to_string()))?;
                    item.visit_time = Some(shifted);
                    item.updated_at = now;
                }
            }
            Ok(())
        })
    }

    fn find_schedule_item(&self, item_id: u64) -> Result<Option<ScheduleItem>> {
        self.read(|tables| tables.items.get(&item_id).cloned())
    }

    fn list_schedule_items(
        &self,
        trip_day_id: u64,
        page: PageRequest,
    ) -> Result<Page<ScheduleItem>> {
        page.validate()?;
        Ok(Page::from_ordered(self.schedule_items(trip_day_id)?, page))
    }

    fn schedule_items(&self, trip_day_id: u64) -> Result<Vec<ScheduleItem>> {
        self.read(|tables| {
            let mut items: Vec<ScheduleItem> = tables
                .items
                .values()
                .filter(|item| item.trip_day_id == trip_day_id)
                .cloned()
                .collect();
            items.sort_by_key(|item| item.seq_no);
            items
        })
    }

    fn update_schedule_item(
        &mut self,
        item_id: u64,
        visit_time: Option<DateTime>,
        memo: Option<&str>,
    ) -> Result<()> {
        self.write(|tables| {
            if let Some(item) = tables.items.get_mut(&item_id) {
                if let Some(visit_time) = visit_time {
                    item.visit_time = Some(visit_time);
                }
                if let Some(memo) = memo {
                    item.memo = Some(memo.to_string());
                }
                item.updated_at = Timestamp::now();
            }
            Ok(())
        })
    }
}

impl CatalogRecords for MemoryStore {
    fn find_region(&self, region_id: u64) -> Result<Option<Region>> {
        self.read(|tables| tables.regions.get(&region_id).cloned())
    }

    fn list_regions(&self, country_code: &str, query: Option<&str>) -> Result<Vec<Region>> {
        let query = query.map(str::to_lowercase);
        self.read(|tables| {
            tables
                .regions
                .values()
                .filter(|region| match &query {
                    Some(query) => region.name.to_lowercase().contains(query.as_str()),
                    None => region.country_code == country_code,
                })
                .cloned()
                .collect()
        })
    }

    fn upsert_place(&mut self, details: &PlaceDetails) -> Result<Place> {
        self.write(|tables| {
            if let Some(existing) = tables
                .places
                .values()
                .find(|place| place.external_ref == details.external_ref)
            {
                return Ok(existing.clone());
            }

            let place = Place {
                id: tables.next_id(),
                name: details.name.clone(),
                category: details.category.clone(),
                address: details.address.clone(),
                lat: details.lat,
                lng: details.lng,
                external_ref: details.external_ref.clone(),
                created_at: Timestamp::now(),
            };
            tables.places.insert(place.id, place.clone());
            Ok(place)
        })
    }

    fn find_place(&self, place_id: u64) -> Result<Option<Place>> {
        self.read(|tables| tables.places.get(&place_id).cloned())
    }
}
