//! Booking lifecycle state machine.

use serde::{Deserialize, Serialize};

use super::BookingError;

/// The state of a booking in its lifecycle.
///
/// State transitions:
/// ```text
/// Pending ──► RoomHeld ──► PaymentPending ──► Confirmed ──► Completed
///    ▲            │               │
///    └─ OnHold ◄──┴───────────────┘        (resume returns to Pending)
///
/// Pending / RoomHeld / PaymentPending / OnHold ──► Rejected
/// any non-terminal state ──► Cancelled / Failed / Expired
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Booking has been created, saga not yet past validation.
    #[default]
    Pending,

    /// Room inventory is held for this booking.
    RoomHeld,

    /// Payment has been prepared, awaiting out-of-band completion.
    PaymentPending,

    /// Payment completed and booking confirmed.
    Confirmed,

    /// Admin paused the booking; resume returns it to Pending.
    OnHold,

    /// Admin rejected the booking. Still cancellable/expirable.
    Rejected,

    /// Stay finished after checkout (terminal state).
    Completed,

    /// Booking was cancelled (terminal state).
    Cancelled,

    /// Saga failed and was compensated (terminal state).
    Failed,

    /// Booking timed out before payment (terminal state).
    Expired,
}

impl BookingStatus {
    /// Returns true if a room hold can be placed in this state.
    pub fn can_hold_room(&self) -> bool {
        matches!(self, BookingStatus::Pending)
    }

    /// Returns true if payment can be prepared in this state.
    pub fn can_prepare_payment(&self) -> bool {
        matches!(self, BookingStatus::RoomHeld)
    }

    /// Returns true if the booking can be confirmed in this state.
    pub fn can_confirm(&self) -> bool {
        matches!(self, BookingStatus::PaymentPending)
    }

    /// Returns true if an admin can put the booking on hold in this state.
    pub fn can_put_on_hold(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::RoomHeld | BookingStatus::PaymentPending
        )
    }

    /// Returns true if the booking can be resumed from hold.
    pub fn can_resume(&self) -> bool {
        matches!(self, BookingStatus::OnHold)
    }

    /// Returns true if an admin can reject the booking in this state.
    pub fn can_reject(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending
                | BookingStatus::RoomHeld
                | BookingStatus::PaymentPending
                | BookingStatus::OnHold
        )
    }

    /// Returns true if the stay can be marked completed in this state.
    pub fn can_complete_stay(&self) -> bool {
        matches!(self, BookingStatus::Confirmed)
    }

    /// Returns true if the booking can be cancelled in this state.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled
                | BookingStatus::Failed
                | BookingStatus::Expired
                | BookingStatus::Completed
        )
    }

    /// Applies a lifecycle event, returning the next state.
    ///
    /// This is the only place transitions are decided; every status
    /// mutation on a booking goes through it.
    pub fn apply(self, event: BookingEvent) -> Result<BookingStatus, BookingError> {
        match event {
            BookingEvent::Validated if matches!(self, BookingStatus::Pending) => {
                Ok(BookingStatus::Pending)
            }
            BookingEvent::RoomHeld if self.can_hold_room() => Ok(BookingStatus::RoomHeld),
            BookingEvent::PaymentPrepared if self.can_prepare_payment() => {
                Ok(BookingStatus::PaymentPending)
            }
            BookingEvent::Confirmed if self.can_confirm() => Ok(BookingStatus::Confirmed),
            BookingEvent::PutOnHold if self.can_put_on_hold() => Ok(BookingStatus::OnHold),
            BookingEvent::Resumed if self.can_resume() => Ok(BookingStatus::Pending),
            BookingEvent::Rejected if self.can_reject() => Ok(BookingStatus::Rejected),
            BookingEvent::StayCompleted if self.can_complete_stay() => {
                Ok(BookingStatus::Completed)
            }
            BookingEvent::Cancelled if matches!(self, BookingStatus::Cancelled) => {
                Err(BookingError::AlreadyCancelled)
            }
            BookingEvent::Cancelled if self.can_cancel() => Ok(BookingStatus::Cancelled),
            BookingEvent::Failed if !self.is_terminal() => Ok(BookingStatus::Failed),
            BookingEvent::Expired if !self.is_terminal() => Ok(BookingStatus::Expired),
            _ => Err(BookingError::InvalidTransition {
                status: self,
                action: event.action(),
            }),
        }
    }

    /// Returns the status name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::RoomHeld => "ROOM_HELD",
            BookingStatus::PaymentPending => "PAYMENT_PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::OnHold => "ON_HOLD",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Failed => "FAILED",
            BookingStatus::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lifecycle event applied to a booking's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingEvent {
    /// Saga validation passed; the booking stays Pending.
    Validated,

    /// Room inventory was held.
    RoomHeld,

    /// Payment was prepared for out-of-band completion.
    PaymentPrepared,

    /// Payment completed and the booking was confirmed.
    Confirmed,

    /// Admin paused the booking.
    PutOnHold,

    /// Admin resumed a held booking.
    Resumed,

    /// Admin rejected the booking.
    Rejected,

    /// The booking was cancelled.
    Cancelled,

    /// The saga failed and was compensated.
    Failed,

    /// The booking timed out before payment.
    Expired,

    /// The stay finished after checkout.
    StayCompleted,
}

impl BookingEvent {
    /// The action name used in transition error messages.
    pub fn action(&self) -> &'static str {
        match self {
            BookingEvent::Validated => "validate",
            BookingEvent::RoomHeld => "hold room",
            BookingEvent::PaymentPrepared => "prepare payment",
            BookingEvent::Confirmed => "confirm",
            BookingEvent::PutOnHold => "put on hold",
            BookingEvent::Resumed => "resume",
            BookingEvent::Rejected => "reject",
            BookingEvent::Cancelled => "cancel",
            BookingEvent::Failed => "fail",
            BookingEvent::Expired => "expire",
            BookingEvent::StayCompleted => "complete stay",
        }
    }
}
