//! The saga step abstraction.

use async_trait::async_trait;

use crate::context::SagaContext;
use crate::error::SagaError;

/// A single step in a saga.
///
/// Steps mutate the shared [`SagaContext`] in `execute` and undo their own
/// work in `compensate`. The orchestrator invokes `compensate` only for
/// steps whose `execute` previously succeeded, in reverse completion order.
#[async_trait]
pub trait SagaStep: Send + Sync {
    /// Stable name used in logs and recorded on the booking.
    fn name(&self) -> &'static str;

    /// Performs the step's forward work.
    async fn execute(&self, ctx: &mut SagaContext) -> Result<(), SagaError>;

    /// Undoes the step's forward work.
    ///
    /// Errors are logged and swallowed by the orchestrator so the
    /// remaining compensations still run.
    async fn compensate(&self, ctx: &mut SagaContext) -> Result<(), SagaError>;
}
