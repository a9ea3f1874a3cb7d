//! Domain layer for the booking platform.
//!
//! This crate provides the core booking model:
//! - Booking entity with its full lifecycle
//! - BookingStatus state machine with an explicit transition table
//! - Money and PaymentMethod value objects

pub mod booking;

pub use booking::{
    BOOKING_EXPIRY_MINUTES, Booking, BookingError, BookingEvent, BookingRequest, BookingStatus,
    Money, PaymentMethod,
};
