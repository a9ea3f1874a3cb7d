//! Collaborator traits and in-memory implementations for saga steps.

use std::future::Future;
use std::time::Duration;

pub mod catalog;
pub mod notifier;
pub mod payment;

pub use catalog::{CatalogService, InMemoryCatalogService, RoomHold};
pub use notifier::{
    InMemoryNotificationService, Notification, NotificationKind, NotificationService,
};
pub use payment::{InMemoryPaymentGateway, PaymentGateway, RefundOutcome};

use crate::error::SagaError;

/// Bounds a collaborator call with a deadline.
///
/// Elapsing the deadline yields [`SagaError::Timeout`] naming the
/// collaborator; the call's own error passes through untouched.
pub async fn with_timeout<T, F>(
    collaborator: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T, SagaError>
where
    F: Future<Output = Result<T, SagaError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(SagaError::Timeout {
            collaborator,
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
