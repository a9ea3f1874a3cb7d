//! Saga pattern implementation for booking creation.
//!
//! This crate provides the Saga Pattern for orchestrating the multi-step
//! booking workflow with compensating actions on failure.
//!
//! The booking creation saga follows these steps:
//! 1. Validate the booking request
//! 2. Hold the room with the catalog
//! 3. Process payment
//!
//! If any step fails, previously completed steps are compensated in reverse
//! order and the booking is marked failed. Confirmation runs as a separate
//! step once payment settles out of band.

pub mod booking_creation;
pub mod context;
pub mod error;
pub mod locks;
pub mod orchestrator;
pub mod service;
pub mod services;
pub mod step;
pub mod steps;

pub use context::SagaContext;
pub use error::SagaError;
pub use locks::BookingLocks;
pub use orchestrator::SagaOrchestrator;
pub use service::{BookingOutcome, BookingService, HousekeepingReport};
pub use services::{
    CatalogService, InMemoryCatalogService, InMemoryNotificationService, InMemoryPaymentGateway,
    Notification, NotificationKind, NotificationService, PaymentGateway, RefundOutcome, RoomHold,
};
pub use step::SagaStep;
pub use steps::{ConfirmBooking, HoldRoom, ProcessPayment, ValidateBooking};
