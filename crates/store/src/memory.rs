use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{BookingId, GuestId, HotelId};
use domain::{Booking, BookingStatus};
use tokio::sync::RwLock;

use crate::{BookingRepository, Result, StoreError};

#[derive(Debug, Default)]
struct InMemoryStoreState {
    bookings: HashMap<BookingId, Booking>,
    fail_on_save: bool,
}

/// In-memory booking store for testing and single-process deployments.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

impl InMemoryBookingStore {
    /// Creates a new empty in-memory booking store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail save calls.
    pub async fn set_fail_on_save(&self, fail: bool) {
        self.state.write().await.fail_on_save = fail;
    }

    /// Returns the number of bookings stored.
    pub async fn booking_count(&self) -> usize {
        self.state.read().await.bookings.len()
    }

    /// Clears all bookings.
    pub async fn clear(&self) {
        self.state.write().await.bookings.clear();
    }

    async fn collect_sorted<F>(&self, predicate: F) -> Vec<Booking>
    where
        F: Fn(&Booking) -> bool,
    {
        let state = self.state.read().await;
        let mut bookings: Vec<_> = state
            .bookings
            .values()
            .filter(|b| predicate(b))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.created_at());
        bookings
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingStore {
    async fn save(&self, booking: &Booking) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_save {
            return Err(StoreError::Backend("save failed".to_string()));
        }
        state.bookings.insert(booking.id(), booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        let state = self.state.read().await;
        Ok(state.bookings.get(&id).cloned())
    }

    async fn find_by_status(&self, status: BookingStatus) -> Result<Vec<Booking>> {
        Ok(self.collect_sorted(|b| b.status() == status).await)
    }

    async fn find_by_guest(&self, guest_id: GuestId) -> Result<Vec<Booking>> {
        Ok(self.collect_sorted(|b| b.guest_id() == guest_id).await)
    }

    async fn find_by_hotel(&self, hotel_id: HotelId) -> Result<Vec<Booking>> {
        Ok(self.collect_sorted(|b| b.hotel_id() == hotel_id).await)
    }

    async fn find_all(&self) -> Result<Vec<Booking>> {
        Ok(self.collect_sorted(|_| true).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use common::RoomId;
    use domain::{BookingRequest, Money};

    fn booking_for(guest_id: GuestId, hotel_id: HotelId) -> Booking {
        let check_in = Utc::now().date_naive() + Duration::days(7);
        let request = BookingRequest::new(
            guest_id,
            hotel_id,
            RoomId::new(),
            check_in,
            check_in + Duration::days(2),
            2,
        );
        Booking::new(request, Money::from_cents(30000))
    }

    #[tokio::test]
    async fn save_and_find_by_id() {
        let store = InMemoryBookingStore::new();
        let booking = booking_for(GuestId::new(), HotelId::new());

        store.save(&booking).await.unwrap();
        assert_eq!(store.booking_count().await, 1);

        let found = store.find_by_id(booking.id()).await.unwrap().unwrap();
        assert_eq!(found, booking);
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown() {
        let store = InMemoryBookingStore::new();
        let found = store.find_by_id(BookingId::new()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn save_replaces_existing_record() {
        let store = InMemoryBookingStore::new();
        let mut booking = booking_for(GuestId::new(), HotelId::new());

        store.save(&booking).await.unwrap();
        booking.hold_room().unwrap();
        store.save(&booking).await.unwrap();

        assert_eq!(store.booking_count().await, 1);
        let found = store.find_by_id(booking.id()).await.unwrap().unwrap();
        assert_eq!(found.status(), BookingStatus::RoomHeld);
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let store = InMemoryBookingStore::new();
        let pending = booking_for(GuestId::new(), HotelId::new());
        let mut held = booking_for(GuestId::new(), HotelId::new());
        held.hold_room().unwrap();

        store.save(&pending).await.unwrap();
        store.save(&held).await.unwrap();

        let found = store
            .find_by_status(BookingStatus::RoomHeld)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), held.id());
    }

    #[tokio::test]
    async fn find_by_guest_and_hotel() {
        let store = InMemoryBookingStore::new();
        let guest = GuestId::new();
        let hotel = HotelId::new();

        store.save(&booking_for(guest, hotel)).await.unwrap();
        store.save(&booking_for(guest, HotelId::new())).await.unwrap();
        store
            .save(&booking_for(GuestId::new(), hotel))
            .await
            .unwrap();

        assert_eq!(store.find_by_guest(guest).await.unwrap().len(), 2);
        assert_eq!(store.find_by_hotel(hotel).await.unwrap().len(), 2);
        assert_eq!(store.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn fail_on_save_surfaces_backend_error() {
        let store = InMemoryBookingStore::new();
        store.set_fail_on_save(true).await;

        let booking = booking_for(GuestId::new(), HotelId::new());
        let result = store.save(&booking).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert_eq!(store.booking_count().await, 0);
    }
}
