//! Booking creation saga constants.
//!
//! Context keys are the only channel steps use to talk to each other and
//! to their own compensations, so every key lives here rather than as a
//! string literal at the point of use.

/// The saga type identifier for booking creation.
pub const SAGA_TYPE: &str = "BookingCreation";

/// Step name: Validate the booking request.
pub const STEP_VALIDATE_BOOKING: &str = "ValidateBooking";

/// Step name: Hold the room with the catalog.
pub const STEP_HOLD_ROOM: &str = "HoldRoom";

/// Step name: Process payment for the booking.
pub const STEP_PROCESS_PAYMENT: &str = "ProcessPayment";

/// Step name: Confirm the booking after payment settles.
pub const STEP_CONFIRM_BOOKING: &str = "ConfirmBooking";

/// Context key: true once the room hold is in place.
pub const KEY_ROOM_HELD: &str = "roomHeld";

/// Context key: true once payment has been prepared.
pub const KEY_PAYMENT_READY: &str = "paymentReady";

/// Context key: true once the booking is confirmed.
pub const KEY_BOOKING_CONFIRMED: &str = "bookingConfirmed";

/// Cancellation reason recorded when compensation cancels a booking that
/// had already reached confirmation.
pub const COMPENSATION_CANCEL_REASON: &str = "Saga compensation - booking failed";
