//! Room hold step.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::booking_creation;
use crate::context::SagaContext;
use crate::error::SagaError;
use crate::services::catalog::CatalogService;
use crate::services::with_timeout;
use crate::step::SagaStep;

/// Places a hold on the booking's room with the catalog.
///
/// Compensation releases the hold again. The `roomHeld` context marker
/// flips to false only after the release call succeeds.
#[derive(Debug)]
pub struct HoldRoom<C> {
    catalog: C,
    timeout: Duration,
}

impl<C> HoldRoom<C> {
    /// Creates the hold step around a catalog collaborator.
    pub fn new(catalog: C, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }
}

#[async_trait]
impl<C: CatalogService> SagaStep for HoldRoom<C> {
    fn name(&self) -> &'static str {
        booking_creation::STEP_HOLD_ROOM
    }

    async fn execute(&self, ctx: &mut SagaContext) -> Result<(), SagaError> {
        let room_id = ctx.booking().room_id();
        let hold = with_timeout("catalog", self.timeout, self.catalog.hold_room(room_id)).await?;
        if !hold.held {
            return Err(SagaError::RoomUnavailable(room_id));
        }

        ctx.booking_mut().hold_room()?;
        ctx.put_data(booking_creation::KEY_ROOM_HELD, json!(true));
        tracing::info!(booking_id = %ctx.booking().id(), %room_id, "room held");
        Ok(())
    }

    async fn compensate(&self, ctx: &mut SagaContext) -> Result<(), SagaError> {
        let room_id = ctx.booking().room_id();
        with_timeout("catalog", self.timeout, self.catalog.release_room(room_id)).await?;

        ctx.put_data(booking_creation::KEY_ROOM_HELD, json!(false));
        tracing::info!(booking_id = %ctx.booking().id(), %room_id, "room hold released");
        Ok(())
    }
}
