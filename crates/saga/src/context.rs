//! Shared context handed to saga steps.

use std::collections::HashMap;

use domain::{Booking, PaymentMethod};
use serde_json::Value;

/// Mutable state threaded through one saga execution.
///
/// The context carries the booking being worked on, the requested payment
/// method, a free-form data map steps use to leave markers for their
/// compensations, and bookkeeping for failure handling. A context lives
/// for a single orchestrator run and is never shared across requests.
#[derive(Debug, Clone)]
pub struct SagaContext {
    booking: Booking,
    payment_method: Option<PaymentMethod>,
    data: HashMap<String, Value>,
    compensating: bool,
    error: Option<String>,
}

impl SagaContext {
    /// Creates a context for a booking creation saga.
    pub fn new(booking: Booking, payment_method: PaymentMethod) -> Self {
        Self {
            booking,
            payment_method: Some(payment_method),
            data: HashMap::new(),
            compensating: false,
            error: None,
        }
    }

    /// Creates a context for running the confirmation step on its own.
    pub fn for_confirmation(booking: Booking) -> Self {
        Self {
            booking,
            payment_method: None,
            data: HashMap::new(),
            compensating: false,
            error: None,
        }
    }

    /// The booking being worked on.
    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    /// Mutable access to the booking for state transitions.
    pub fn booking_mut(&mut self) -> &mut Booking {
        &mut self.booking
    }

    /// The payment method requested at creation, if any.
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// Stores a marker value under the given key.
    pub fn put_data(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Returns the value stored under the given key.
    pub fn data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns the boolean marker stored under the given key, or false.
    pub fn flag(&self, key: &str) -> bool {
        self.data.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// True once the saga has switched to running compensations.
    pub fn is_compensating(&self) -> bool {
        self.compensating
    }

    /// Switches the context into compensation mode.
    pub fn begin_compensation(&mut self) {
        self.compensating = true;
    }

    /// Records the failure that triggered compensation.
    ///
    /// Only the first recorded error is kept; later calls are no-ops.
    pub fn record_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    /// The first error recorded during execution, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Consumes the context, returning the booking and the recorded error.
    pub fn into_parts(self) -> (Booking, Option<String>) {
        (self.booking, self.error)
    }
}
