//! Per-booking locks for serializing admin operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use common::BookingId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serializes load-modify-save sequences on a single booking.
///
/// Racing admin calls such as a cancel and a confirm on the same booking
/// id take the same lock, so one of them always sees the other's write.
/// Operations on different bookings never contend. Idle entries are
/// pruned on the next acquisition.
#[derive(Debug, Clone, Default)]
pub struct BookingLocks {
    locks: Arc<Mutex<HashMap<BookingId, Arc<AsyncMutex<()>>>>>,
}

impl BookingLocks {
    /// Creates an empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for a booking id, creating it on first use.
    pub async fn lock(&self, id: BookingId) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().unwrap();
            // An entry only the map still references has no holder or waiter.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(id).or_default())
        };
        entry.lock_owned().await
    }

    /// Number of lock entries currently tracked.
    pub fn active_locks(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}
