pub mod types;

pub use types::{BookingId, GuestId, HotelId, RoomId, SagaId};
