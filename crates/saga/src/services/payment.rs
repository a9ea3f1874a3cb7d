//! Payment gateway trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Money;

use crate::error::SagaError;

/// Result of a refund request.
#[derive(Debug, Clone)]
pub struct RefundOutcome {
    /// Whether the gateway accepted the refund.
    pub success: bool,
}

/// Trait for payment gateway operations.
///
/// Capture happens out of band through the gateway's own settlement flow,
/// so the saga only ever asks for refunds.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Refunds a settled payment.
    async fn refund(&self, payment_ref: &str, amount: Money) -> Result<RefundOutcome, SagaError>;
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    refunds: Vec<(String, Money)>,
    fail_on_refund: bool,
    decline_refunds: bool,
}

/// In-memory payment gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory payment gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail refund calls.
    pub fn set_fail_on_refund(&self, fail: bool) {
        self.state.write().unwrap().fail_on_refund = fail;
    }

    /// Configures the gateway to decline refunds instead of failing.
    pub fn set_decline_refunds(&self, decline: bool) {
        self.state.write().unwrap().decline_refunds = decline;
    }

    /// Number of refunds accepted so far.
    pub fn refund_count(&self) -> usize {
        self.state.read().unwrap().refunds.len()
    }

    /// Returns true if a refund was accepted for the given payment.
    pub fn has_refund_for(&self, payment_ref: &str) -> bool {
        self.state
            .read()
            .unwrap()
            .refunds
            .iter()
            .any(|(r, _)| r == payment_ref)
    }

    /// Amount of the most recent refund, if any.
    pub fn last_refund_amount(&self) -> Option<Money> {
        self.state
            .read()
            .unwrap()
            .refunds
            .last()
            .map(|(_, amount)| *amount)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn refund(&self, payment_ref: &str, amount: Money) -> Result<RefundOutcome, SagaError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_refund {
            return Err(SagaError::PaymentGateway(
                "Refund request failed".to_string(),
            ));
        }
        if state.decline_refunds {
            return Ok(RefundOutcome { success: false });
        }

        state.refunds.push((payment_ref.to_string(), amount));
        Ok(RefundOutcome { success: true })
    }
}
