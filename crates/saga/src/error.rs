//! Saga error types.

use common::{BookingId, RoomId};
use domain::BookingError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during saga operations.
#[derive(Debug, Error)]
pub enum SagaError {
    /// A saga step failed.
    #[error("Saga step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },

    /// The catalog declined to hold the room.
    #[error("Room {0} is not available for the requested stay")]
    RoomUnavailable(RoomId),

    /// Catalog service error.
    #[error("Catalog service error: {0}")]
    CatalogService(String),

    /// Payment gateway error.
    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    /// Notification service error.
    #[error("Notification service error: {0}")]
    NotificationService(String),

    /// A collaborator call exceeded its deadline.
    #[error("{collaborator} call timed out after {timeout_ms}ms")]
    Timeout {
        collaborator: &'static str,
        timeout_ms: u64,
    },

    /// Booking rule violation.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Booking not found.
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
