//! Payment processing step.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::booking_creation;
use crate::context::SagaContext;
use crate::error::SagaError;
use crate::services::payment::PaymentGateway;
use crate::services::with_timeout;
use crate::step::SagaStep;

/// Prepares the booking for payment.
///
/// The mock payment method settles immediately, stamping a payment
/// reference and confirming the booking in the same step. Real methods
/// leave the booking awaiting an out-of-band settlement callback; the
/// gateway is never charged from here. Compensation refunds any payment
/// already recorded on the booking.
#[derive(Debug)]
pub struct ProcessPayment<P> {
    gateway: P,
    timeout: Duration,
}

impl<P> ProcessPayment<P> {
    /// Creates the payment step around a gateway collaborator.
    pub fn new(gateway: P, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }
}

#[async_trait]
impl<P: PaymentGateway> SagaStep for ProcessPayment<P> {
    fn name(&self) -> &'static str {
        booking_creation::STEP_PROCESS_PAYMENT
    }

    async fn execute(&self, ctx: &mut SagaContext) -> Result<(), SagaError> {
        ctx.booking_mut().prepare_payment()?;

        match ctx.payment_method() {
            Some(method) if method.is_mock() => {
                let payment_ref = format!("MOCK-{}", Utc::now().timestamp_millis());
                ctx.booking_mut().set_payment_ref(payment_ref);
                ctx.booking_mut().confirm()?;
                tracing::info!(
                    booking_id = %ctx.booking().id(),
                    "mock payment settled, booking confirmed"
                );
            }
            _ => {
                tracing::info!(
                    booking_id = %ctx.booking().id(),
                    "payment prepared, awaiting settlement"
                );
            }
        }

        ctx.put_data(booking_creation::KEY_PAYMENT_READY, json!(true));
        Ok(())
    }

    async fn compensate(&self, ctx: &mut SagaContext) -> Result<(), SagaError> {
        if let Some(payment_ref) = ctx.booking().payment_ref().map(str::to_string) {
            let amount = ctx.booking().total_amount();
            let outcome = with_timeout(
                "payment gateway",
                self.timeout,
                self.gateway.refund(&payment_ref, amount),
            )
            .await?;

            if outcome.success {
                tracing::info!(booking_id = %ctx.booking().id(), %payment_ref, "payment refunded");
            } else {
                tracing::warn!(booking_id = %ctx.booking().id(), %payment_ref, "refund declined");
            }
        }

        ctx.put_data(booking_creation::KEY_PAYMENT_READY, json!(false));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::payment::InMemoryPaymentGateway;
    use chrono::Duration as ChronoDuration;
    use common::{GuestId, HotelId, RoomId};
    use domain::{Booking, BookingRequest, BookingStatus, Money, PaymentMethod};

    fn context_with(method: PaymentMethod) -> SagaContext {
        let check_in = Utc::now().date_naive() + ChronoDuration::days(7);
        let request = BookingRequest::new(
            GuestId::new(),
            HotelId::new(),
            RoomId::new(),
            check_in,
            check_in + ChronoDuration::days(2),
            2,
        );
        let mut booking = Booking::new(request, Money::from_cents(30_000));
        booking.hold_room().unwrap();
        SagaContext::new(booking, method)
    }

    fn step(gateway: &InMemoryPaymentGateway) -> ProcessPayment<InMemoryPaymentGateway> {
        ProcessPayment::new(gateway.clone(), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_real_method_leaves_booking_awaiting_payment() {
        let gateway = InMemoryPaymentGateway::new();
        let step = step(&gateway);
        let mut ctx = context_with(PaymentMethod::Stripe);

        step.execute(&mut ctx).await.unwrap();

        assert_eq!(ctx.booking().status(), BookingStatus::PaymentPending);
        assert!(ctx.booking().payment_ref().is_none());
        assert!(ctx.flag(booking_creation::KEY_PAYMENT_READY));
        assert_eq!(gateway.refund_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_method_settles_and_confirms() {
        let gateway = InMemoryPaymentGateway::new();
        let step = step(&gateway);
        let mut ctx = context_with(PaymentMethod::Mock);

        step.execute(&mut ctx).await.unwrap();

        assert_eq!(ctx.booking().status(), BookingStatus::Confirmed);
        let payment_ref = ctx.booking().payment_ref().unwrap();
        assert!(payment_ref.starts_with("MOCK-"));
    }

    #[tokio::test]
    async fn test_compensation_refunds_settled_payment() {
        let gateway = InMemoryPaymentGateway::new();
        let step = step(&gateway);
        let mut ctx = context_with(PaymentMethod::Mock);

        step.execute(&mut ctx).await.unwrap();
        step.compensate(&mut ctx).await.unwrap();

        assert_eq!(gateway.refund_count(), 1);
        assert_eq!(gateway.last_refund_amount(), Some(Money::from_cents(30_000)));
        assert!(!ctx.flag(booking_creation::KEY_PAYMENT_READY));
    }

    #[tokio::test]
    async fn test_compensation_without_payment_skips_the_gateway() {
        let gateway = InMemoryPaymentGateway::new();
        let step = step(&gateway);
        let mut ctx = context_with(PaymentMethod::Stripe);

        step.execute(&mut ctx).await.unwrap();
        step.compensate(&mut ctx).await.unwrap();

        assert_eq!(gateway.refund_count(), 0);
        assert!(!ctx.flag(booking_creation::KEY_PAYMENT_READY));
    }

    #[tokio::test]
    async fn test_declined_refund_is_not_an_error() {
        let gateway = InMemoryPaymentGateway::new();
        gateway.set_decline_refunds(true);
        let step = step(&gateway);
        let mut ctx = context_with(PaymentMethod::Mock);

        step.execute(&mut ctx).await.unwrap();
        step.compensate(&mut ctx).await.unwrap();

        assert_eq!(gateway.refund_count(), 0);
    }
}
