//! Booking validation step.

use async_trait::async_trait;
use chrono::Utc;

use crate::booking_creation;
use crate::context::SagaContext;
use crate::error::SagaError;
use crate::step::SagaStep;

/// Validates the booking before any external work happens.
///
/// Checks stay dates and guest count against today's date. Has nothing to
/// undo, so its compensation is a no-op.
#[derive(Debug, Default)]
pub struct ValidateBooking;

impl ValidateBooking {
    /// Creates the validation step.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SagaStep for ValidateBooking {
    fn name(&self) -> &'static str {
        booking_creation::STEP_VALIDATE_BOOKING
    }

    async fn execute(&self, ctx: &mut SagaContext) -> Result<(), SagaError> {
        let today = Utc::now().date_naive();
        ctx.booking().validate_stay(today)?;
        ctx.booking_mut().mark_validated()?;
        tracing::info!(booking_id = %ctx.booking().id(), "booking validated");
        Ok(())
    }

    async fn compensate(&self, ctx: &mut SagaContext) -> Result<(), SagaError> {
        tracing::debug!(booking_id = %ctx.booking().id(), "validation has nothing to undo");
        Ok(())
    }
}
