//! Booking entity implementation.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use common::{BookingId, GuestId, HotelId, RoomId, SagaId};
use serde::{Deserialize, Serialize};

use super::{BookingError, BookingEvent, BookingStatus, Money};

/// Minutes an unpaid booking may live before the expiry sweep claims it.
pub const BOOKING_EXPIRY_MINUTES: i64 = 15;

/// Input for creating a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Guest placing the booking.
    pub guest_id: GuestId,

    /// Hotel being booked.
    pub hotel_id: HotelId,

    /// Room within the hotel.
    pub room_id: RoomId,

    /// First night of the stay.
    pub check_in: NaiveDate,

    /// Checkout date (exclusive; not a night of the stay).
    pub check_out: NaiveDate,

    /// Number of guests staying.
    pub guests: u32,
}

impl BookingRequest {
    /// Creates a new booking request.
    pub fn new(
        guest_id: GuestId,
        hotel_id: HotelId,
        room_id: RoomId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Self {
        Self {
            guest_id,
            hotel_id,
            room_id,
            check_in,
            check_out,
            guests,
        }
    }

    /// Number of nights between check-in and check-out.
    ///
    /// Negative when the dates are inverted; callers clamp before
    /// pricing so an invalid request never produces a negative total.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// A hotel booking with its full lifecycle.
///
/// All status changes go through [`BookingStatus::apply`]; there is no
/// way to set an arbitrary status from outside this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier.
    id: BookingId,

    /// Guest who placed the booking.
    guest_id: GuestId,

    /// Hotel being booked.
    hotel_id: HotelId,

    /// Room within the hotel.
    room_id: RoomId,

    /// First night of the stay.
    check_in: NaiveDate,

    /// Checkout date.
    check_out: NaiveDate,

    /// Number of guests staying.
    guests: u32,

    /// Total price, fixed at creation.
    total_amount: Money,

    /// Current lifecycle state.
    status: BookingStatus,

    /// Reference returned by the payment provider, if any.
    payment_ref: Option<String>,

    /// Creation timestamp.
    created_at: DateTime<Utc>,

    /// Timestamp of the last mutation.
    updated_at: DateTime<Utc>,

    /// Unpaid bookings expire after this instant. Fixed at creation.
    expires_at: DateTime<Utc>,

    /// Why the booking was cancelled or rejected, if it was.
    cancellation_reason: Option<String>,

    /// Correlation id of the creation saga.
    saga_id: SagaId,

    /// Name of the last saga step that completed, for diagnostics.
    last_completed_step: Option<String>,
}

impl Booking {
    /// Creates a new Pending booking from a request and a computed total.
    pub fn new(request: BookingRequest, total_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::new(),
            guest_id: request.guest_id,
            hotel_id: request.hotel_id,
            room_id: request.room_id,
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            total_amount,
            status: BookingStatus::Pending,
            payment_ref: None,
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::minutes(BOOKING_EXPIRY_MINUTES),
            cancellation_reason: None,
            saga_id: SagaId::new(),
            last_completed_step: None,
        }
    }
}

// Query methods
impl Booking {
    /// Returns the booking ID.
    pub fn id(&self) -> BookingId {
        self.id
    }

    /// Returns the guest who placed the booking.
    pub fn guest_id(&self) -> GuestId {
        self.guest_id
    }

    /// Returns the booked hotel.
    pub fn hotel_id(&self) -> HotelId {
        self.hotel_id
    }

    /// Returns the booked room.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns the check-in date.
    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Returns the checkout date.
    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Returns the number of guests.
    pub fn guests(&self) -> u32 {
        self.guests
    }

    /// Returns the total price.
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Returns the current status.
    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// Returns the payment reference, if one was recorded.
    pub fn payment_ref(&self) -> Option<&str> {
        self.payment_ref.as_deref()
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp of the last mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the expiry deadline.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the cancellation or rejection reason, if any.
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Returns the saga correlation id.
    pub fn saga_id(&self) -> SagaId {
        self.saga_id
    }

    /// Returns the name of the last completed saga step.
    pub fn last_completed_step(&self) -> Option<&str> {
        self.last_completed_step.as_deref()
    }

    /// Returns true if the booking is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns true if the expiry deadline has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// Command methods
impl Booking {
    /// Checks the stay rules: dates strictly ordered, check-in not in
    /// the past, at least one guest.
    pub fn validate_stay(&self, today: NaiveDate) -> Result<(), BookingError> {
        if self.check_in >= self.check_out {
            return Err(BookingError::InvalidStayDates);
        }
        if self.check_in < today {
            return Err(BookingError::CheckInInPast);
        }
        if self.guests < 1 {
            return Err(BookingError::InvalidGuestCount {
                guests: self.guests,
            });
        }
        Ok(())
    }

    /// Records that saga validation passed. Fails unless Pending.
    pub fn mark_validated(&mut self) -> Result<(), BookingError> {
        self.transition(BookingEvent::Validated)
    }

    /// Moves the booking to RoomHeld.
    pub fn hold_room(&mut self) -> Result<(), BookingError> {
        self.transition(BookingEvent::RoomHeld)
    }

    /// Moves the booking to PaymentPending.
    pub fn prepare_payment(&mut self) -> Result<(), BookingError> {
        self.transition(BookingEvent::PaymentPrepared)
    }

    /// Confirms the booking. Fails unless PaymentPending.
    pub fn confirm(&mut self) -> Result<(), BookingError> {
        self.transition(BookingEvent::Confirmed)
    }

    /// Puts the booking on administrative hold.
    pub fn put_on_hold(&mut self) -> Result<(), BookingError> {
        self.transition(BookingEvent::PutOnHold)
    }

    /// Resumes a held booking back to Pending.
    pub fn resume(&mut self) -> Result<(), BookingError> {
        self.transition(BookingEvent::Resumed)
    }

    /// Rejects the booking, recording the reason.
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), BookingError> {
        self.transition(BookingEvent::Rejected)?;
        self.cancellation_reason = Some(reason.into());
        Ok(())
    }

    /// Cancels the booking, recording the reason.
    pub fn cancel(&mut self, reason: impl Into<String>) -> Result<(), BookingError> {
        self.transition(BookingEvent::Cancelled)?;
        self.cancellation_reason = Some(reason.into());
        Ok(())
    }

    /// Marks the booking failed after saga compensation.
    pub fn fail(&mut self) -> Result<(), BookingError> {
        self.transition(BookingEvent::Failed)
    }

    /// Expires an unpaid booking.
    pub fn expire(&mut self) -> Result<(), BookingError> {
        self.transition(BookingEvent::Expired)
    }

    /// Marks the stay completed after checkout.
    pub fn complete_stay(&mut self) -> Result<(), BookingError> {
        self.transition(BookingEvent::StayCompleted)
    }

    /// Records the payment provider's reference.
    pub fn set_payment_ref(&mut self, payment_ref: impl Into<String>) {
        self.payment_ref = Some(payment_ref.into());
        self.touch();
    }

    /// Records the name of the last saga step that completed.
    pub fn record_completed_step(&mut self, step: impl Into<String>) {
        self.last_completed_step = Some(step.into());
        self.touch();
    }

    fn transition(&mut self, event: BookingEvent) -> Result<(), BookingError> {
        self.status = self.status.apply(event)?;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
