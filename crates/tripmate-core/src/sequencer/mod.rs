//! Dense ordinal sequencing for trip days and schedule items.
//!
//! [`DaySequencer`] keeps `day_no` dense within a trip and [`ItemSequencer`]
//! keeps `seq_no` dense within a trip day. Both borrow a [`Store`] for the
//! duration of a call and run every structural change inside one transaction:
//!
//! 1. check that the actor owns the trip,
//! 2. lock the parent,
//! 3. re-read the current maximum under the lock,
//! 4. shift siblings and write the change,
//! 5. commit, or roll back on any failure.
//!
//! Because the maximum is read after the lock is held, two concurrent appends
//! to the same parent always end up at consecutive positions.
//!
//! # Example
//!
//! ```rust
//! use jiff::civil::date;
//! use tripmate_core::{
//!     params::{CreateTripDay, TripDetails},
//!     sequencer::DaySequencer,
//!     store::MemoryStore,
//!     TripLifecycle,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = MemoryStore::new();
//! let trip = TripLifecycle::new(&mut store).create(
//!     1,
//!     &TripDetails {
//!         region_id: 3,
//!         title: "Osaka".to_string(),
//!         start_date: date(2024, 1, 1),
//!         end_date: date(2024, 1, 2),
//!     },
//! )?;
//!
//! let day = DaySequencer::new(&mut store).create(
//!     1,
//!     &CreateTripDay {
//!         trip_id: trip.id,
//!         day_no: None,
//!         memo: Some("Spare day".to_string()),
//!     },
//! )?;
//! assert_eq!(day.day_no, 3);
//! # Ok(())
//! # }
//! ```

use log::warn;

use crate::{
    error::{Result, TripmateError},
    store::{Parent, Store},
};

pub mod days;
pub mod items;


pub use days::DaySequencer;
pub use items::ItemSequencer;

/// Runs `op` inside a transaction on `store`.
///
/// Commits when `op` succeeds and rolls back when it fails. A failed rollback
/// is logged and the original error is returned.
pub fn in_transaction<S, T, F>(store: &mut S, op: F) -> Result<T>
where
    S: Store + ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    store.begin()?;

    match op(store) {
        Ok(value) => match store.commit() {
            Ok(()) => Ok(value),
            Err(e) => {
                rollback_quietly(store);
                Err(e)
            }
        },
        Err(e) => {
            rollback_quietly(store);
            Err(e)
        }
    }
}

fn rollback_quietly<S: Store + ?Sized>(store: &mut S) {
    if let Err(e) = store.rollback() {
        warn!("Rollback failed: {e}");
    }
}

/// Resolves the target of an insert: `requested`, or `max + 1` when absent.
///
/// # Errors
///
/// `InvalidPosition` unless `1 <= target <= max + 1`.
pub fn resolve_insert_position(parent: Parent, requested: Option<u32>, max: u32) -> Result<u32> {
    let append_at = max + 1;
    let target = requested.unwrap_or(append_at);
    if target < 1 || target > append_at {
        return Err(TripmateError::InvalidPosition {
            parent,
            position: target,
            max: append_at,
        });
    }
    Ok(target)
}
