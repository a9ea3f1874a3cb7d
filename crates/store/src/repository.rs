use async_trait::async_trait;
use common::{BookingId, GuestId, HotelId};
use domain::{Booking, BookingStatus};

use crate::Result;

/// Core trait for booking persistence.
///
/// Implementations store whole booking records; a save replaces any
/// previous record with the same id. Single-record atomicity is the
/// only guarantee. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persists a booking, replacing any existing record with the same id.
    async fn save(&self, booking: &Booking) -> Result<()>;

    /// Retrieves a booking by id.
    ///
    /// Returns None if no booking with that id exists.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>>;

    /// Retrieves all bookings in the given status, oldest first.
    async fn find_by_status(&self, status: BookingStatus) -> Result<Vec<Booking>>;

    /// Retrieves all bookings placed by a guest, oldest first.
    async fn find_by_guest(&self, guest_id: GuestId) -> Result<Vec<Booking>>;

    /// Retrieves all bookings for a hotel, oldest first.
    async fn find_by_hotel(&self, hotel_id: HotelId) -> Result<Vec<Booking>>;

    /// Retrieves every booking, oldest first.
    async fn find_all(&self) -> Result<Vec<Booking>>;
}
