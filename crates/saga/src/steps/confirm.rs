//! Booking confirmation step.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::booking_creation;
use crate::context::SagaContext;
use crate::error::SagaError;
use crate::services::notifier::{Notification, NotificationKind, NotificationService};
use crate::services::with_timeout;
use crate::step::SagaStep;

/// Confirms the booking once payment has settled.
///
/// Not registered in the creation saga; the booking service runs it
/// directly when the settlement callback arrives. The guest notification
/// is best effort. Compensation cancels the booking and notifies the
/// guest of the cancellation.
#[derive(Debug)]
pub struct ConfirmBooking<N> {
    notifier: N,
    timeout: Duration,
}

impl<N> ConfirmBooking<N> {
    /// Creates the confirmation step around a notification collaborator.
    pub fn new(notifier: N, timeout: Duration) -> Self {
        Self { notifier, timeout }
    }
}

impl<N: NotificationService> ConfirmBooking<N> {
    async fn notify_guest(&self, ctx: &SagaContext, kind: NotificationKind, title: &str) {
        let booking = ctx.booking();
        let verb = match kind {
            NotificationKind::BookingConfirmed => "confirmed",
            NotificationKind::BookingCancelled => "cancelled",
            NotificationKind::BookingRejected => "rejected",
        };
        let notification = Notification::new(
            booking.guest_id(),
            kind,
            title,
            format!("Your booking {} has been {verb}", booking.id()),
            booking.id().to_string(),
        );

        if let Err(e) = with_timeout("notifier", self.timeout, self.notifier.notify(notification))
            .await
        {
            tracing::warn!(booking_id = %booking.id(), error = %e, "notification failed");
        }
    }
}

#[async_trait]
impl<N: NotificationService> SagaStep for ConfirmBooking<N> {
    fn name(&self) -> &'static str {
        booking_creation::STEP_CONFIRM_BOOKING
    }

    async fn execute(&self, ctx: &mut SagaContext) -> Result<(), SagaError> {
        ctx.booking_mut().confirm()?;
        ctx.put_data(booking_creation::KEY_BOOKING_CONFIRMED, json!(true));

        self.notify_guest(ctx, NotificationKind::BookingConfirmed, "Booking Confirmed")
            .await;
        tracing::info!(booking_id = %ctx.booking().id(), "booking confirmed");
        Ok(())
    }

    async fn compensate(&self, ctx: &mut SagaContext) -> Result<(), SagaError> {
        ctx.booking_mut()
            .cancel(booking_creation::COMPENSATION_CANCEL_REASON)?;
        ctx.put_data(booking_creation::KEY_BOOKING_CONFIRMED, json!(false));

        self.notify_guest(ctx, NotificationKind::BookingCancelled, "Booking Cancelled")
            .await;
        tracing::info!(booking_id = %ctx.booking().id(), "confirmation rolled back");
        Ok(())
    }
}
