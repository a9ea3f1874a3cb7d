//! Booking entity and related types.

mod model;
mod status;
mod value_objects;

pub use model::{BOOKING_EXPIRY_MINUTES, Booking, BookingRequest};
pub use status::{BookingEvent, BookingStatus};
pub use value_objects::{Money, PaymentMethod};

use thiserror::Error;

/// Errors that can occur during booking operations.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Booking is not in the expected state.
    #[error("Invalid state transition: cannot {action} from {status} state")]
    InvalidTransition {
        status: BookingStatus,
        action: &'static str,
    },

    /// Cancelling a booking that is already cancelled.
    #[error("Booking already cancelled")]
    AlreadyCancelled,

    /// Check-in date is not strictly before check-out date.
    #[error("Check-in date must be before check-out date")]
    InvalidStayDates,

    /// Check-in date is before today.
    #[error("Check-in date cannot be in the past")]
    CheckInInPast,

    /// Guest count below the minimum.
    #[error("Number of guests must be at least 1")]
    InvalidGuestCount { guests: u32 },
}
