//! Ownership checks.
//!
//! Only the owner of a trip may read or change it, its days or their items.

use crate::{
    error::{Result, TripmateError},
    store::TripRecords,
};

/// True when `actor_id` owns `trip_id`. A missing trip is not owned by
/// anyone.
pub fn is_owner<S: TripRecords + ?Sized>(store: &S, trip_id: u64, actor_id: u64) -> Result<bool> {
    Ok(store.trip_owner(trip_id)? == Some(actor_id))
}

/// Fails with `TripNotFound` for a missing trip and `Forbidden` when the
/// actor is not its owner.
pub fn authorize<S: TripRecords + ?Sized>(store: &S, trip_id: u64, actor_id: u64) -> Result<()> {
    match store.trip_owner(trip_id)? {
        None => Err(TripmateError::TripNotFound { id: trip_id }),
        Some(owner_id) if owner_id == actor_id => Ok(()),
        Some(_) => Err(TripmateError::Forbidden { trip_id, actor_id }),
    }
}
