//! Catalog service trait and in-memory implementation.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::RoomId;
use domain::Money;

use crate::error::SagaError;

/// Result of a room hold request.
#[derive(Debug, Clone)]
pub struct RoomHold {
    /// Whether the catalog granted the hold.
    pub held: bool,
}

/// Trait for room inventory operations against the hotel catalog.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Places a temporary hold on a room for the stay being booked.
    async fn hold_room(&self, room_id: RoomId) -> Result<RoomHold, SagaError>;

    /// Releases a previously placed hold.
    async fn release_room(&self, room_id: RoomId) -> Result<(), SagaError>;

    /// Returns the nightly rate for a room.
    async fn room_rate(&self, room_id: RoomId) -> Result<Money, SagaError>;
}

/// Nightly rate used when no explicit rate is configured.
const DEFAULT_NIGHTLY_RATE_CENTS: i64 = 15_000;

#[derive(Debug)]
struct InMemoryCatalogState {
    rates: HashMap<RoomId, Money>,
    held: HashSet<RoomId>,
    default_rate: Money,
    fail_on_hold: bool,
    reject_holds: bool,
    fail_on_release: bool,
    fail_on_rate: bool,
}

impl Default for InMemoryCatalogState {
    fn default() -> Self {
        Self {
            rates: HashMap::new(),
            held: HashSet::new(),
            default_rate: Money::from_cents(DEFAULT_NIGHTLY_RATE_CENTS),
            fail_on_hold: false,
            reject_holds: false,
            fail_on_release: false,
            fail_on_rate: false,
        }
    }
}

/// In-memory catalog service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogService {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogService {
    /// Creates a new in-memory catalog service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nightly rate for a room.
    pub fn set_rate(&self, room_id: RoomId, rate: Money) {
        self.state.write().unwrap().rates.insert(room_id, rate);
    }

    /// Configures the service to fail hold calls.
    pub fn set_fail_on_hold(&self, fail: bool) {
        self.state.write().unwrap().fail_on_hold = fail;
    }

    /// Configures the service to answer hold calls with a rejection.
    pub fn set_reject_holds(&self, reject: bool) {
        self.state.write().unwrap().reject_holds = reject;
    }

    /// Configures the service to fail release calls.
    pub fn set_fail_on_release(&self, fail: bool) {
        self.state.write().unwrap().fail_on_release = fail;
    }

    /// Configures the service to fail rate lookups.
    pub fn set_fail_on_rate(&self, fail: bool) {
        self.state.write().unwrap().fail_on_rate = fail;
    }

    /// Returns true if the room currently has a hold.
    pub fn is_held(&self, room_id: RoomId) -> bool {
        self.state.read().unwrap().held.contains(&room_id)
    }

    /// Number of rooms currently held.
    pub fn held_count(&self) -> usize {
        self.state.read().unwrap().held.len()
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalogService {
    async fn hold_room(&self, room_id: RoomId) -> Result<RoomHold, SagaError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_hold {
            return Err(SagaError::CatalogService(
                "Hold request failed".to_string(),
            ));
        }
        if state.reject_holds {
            return Ok(RoomHold { held: false });
        }

        state.held.insert(room_id);
        Ok(RoomHold { held: true })
    }

    async fn release_room(&self, room_id: RoomId) -> Result<(), SagaError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_release {
            return Err(SagaError::CatalogService(
                "Release request failed".to_string(),
            ));
        }

        state.held.remove(&room_id);
        Ok(())
    }

    async fn room_rate(&self, room_id: RoomId) -> Result<Money, SagaError> {
        let state = self.state.read().unwrap();

        if state.fail_on_rate {
            return Err(SagaError::CatalogService("Rate lookup failed".to_string()));
        }

        Ok(state
            .rates
            .get(&room_id)
            .copied()
            .unwrap_or(state.default_rate))
    }
}
