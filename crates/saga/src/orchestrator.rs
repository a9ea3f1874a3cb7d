//! Saga orchestrator driving step execution and compensation.

use std::sync::Arc;

use crate::context::SagaContext;
use crate::step::SagaStep;

/// Orchestrates the execution of registered saga steps.
///
/// Steps run sequentially in registration order. On the first failure the
/// orchestrator records the error in the context, compensates every
/// completed step in reverse order, marks the booking failed, and reports
/// the outcome as a boolean. Step errors never escape the orchestrator.
///
/// The orchestrator holds no per-run state, so one instance can serve
/// concurrent sagas as long as its steps are themselves stateless.
#[derive(Default)]
pub struct SagaOrchestrator {
    steps: Vec<Arc<dyn SagaStep>>,
}

impl SagaOrchestrator {
    /// Creates an orchestrator with no steps registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a step. Registration order is execution order.
    pub fn register_step(&mut self, step: Arc<dyn SagaStep>) {
        self.steps.push(step);
    }

    /// Number of registered steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Runs the saga to completion or through compensation.
    ///
    /// Returns true if every step completed, false if the saga failed and
    /// was compensated.
    #[tracing::instrument(
        skip(self, ctx),
        fields(
            saga_type = "BookingCreation",
            booking_id = %ctx.booking().id(),
            saga_id = %ctx.booking().saga_id(),
        )
    )]
    pub async fn execute(&self, ctx: &mut SagaContext) -> bool {
        metrics::counter!("booking_saga_executions_total").increment(1);
        let saga_start = std::time::Instant::now();
        let mut completed: Vec<Arc<dyn SagaStep>> = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            tracing::info!(step = step.name(), "saga step started");
            match step.execute(ctx).await {
                Ok(()) => {
                    ctx.booking_mut().record_completed_step(step.name());
                    completed.push(Arc::clone(step));
                    tracing::info!(step = step.name(), "saga step completed");
                }
                Err(e) => {
                    tracing::error!(step = step.name(), error = %e, "saga step failed");
                    ctx.record_error(e.to_string());
                    self.compensate(completed, ctx).await;
                    self.mark_booking_failed(ctx);
                    metrics::counter!("booking_saga_failed").increment(1);
                    metrics::histogram!("booking_saga_duration_seconds")
                        .record(saga_start.elapsed().as_secs_f64());
                    return false;
                }
            }
        }

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("booking_saga_duration_seconds").record(duration);
        metrics::counter!("booking_saga_completed").increment(1);
        tracing::info!(duration, "saga completed successfully");
        true
    }

    /// Runs compensations for completed steps in reverse order.
    ///
    /// A failing compensation is logged and skipped; the remaining steps
    /// are still compensated.
    async fn compensate(&self, mut completed: Vec<Arc<dyn SagaStep>>, ctx: &mut SagaContext) {
        ctx.begin_compensation();
        tracing::info!(steps = completed.len(), "starting compensation");

        while let Some(step) = completed.pop() {
            tracing::info!(step = step.name(), "compensating step");
            if let Err(e) = step.compensate(ctx).await {
                metrics::counter!("booking_saga_compensation_failures_total").increment(1);
                tracing::error!(step = step.name(), error = %e, "compensation failed, continuing");
            }
        }

        tracing::info!("compensation finished");
    }

    /// Marks the booking failed after compensation.
    ///
    /// A booking already in a terminal state, for example cancelled by a
    /// compensation, is left as it is.
    fn mark_booking_failed(&self, ctx: &mut SagaContext) {
        if let Err(e) = ctx.booking_mut().fail() {
            tracing::warn!(
                status = %ctx.booking().status(),
                error = %e,
                "booking not marked failed"
            );
        }
    }
}
