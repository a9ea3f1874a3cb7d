//! Booking service driving the saga and the admin operations.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use common::{BookingId, GuestId, HotelId};
use domain::{Booking, BookingError, BookingRequest, BookingStatus, Money, PaymentMethod};
use store::BookingRepository;

use crate::context::SagaContext;
use crate::error::SagaError;
use crate::locks::BookingLocks;
use crate::orchestrator::SagaOrchestrator;
use crate::services::catalog::CatalogService;
use crate::services::notifier::{Notification, NotificationKind, NotificationService};
use crate::services::payment::PaymentGateway;
use crate::services::with_timeout;
use crate::step::SagaStep;
use crate::steps::{ConfirmBooking, HoldRoom, ProcessPayment, ValidateBooking};

/// Outcome returned by booking operations.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    /// The booking after the operation.
    pub booking: Booking,
    /// Human-readable outcome message.
    pub message: String,
}

/// Counts of bookings moved by one housekeeping sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HousekeepingReport {
    /// Bookings expired for sitting unpaid past their deadline.
    pub expired: usize,
    /// Bookings completed because the stay ended.
    pub completed: usize,
}

/// Drives booking creation sagas and administrative operations.
///
/// Owns the repository, the collaborators, the creation saga with its
/// three registered steps, and the standalone confirmation step that runs
/// once payment settles. All operations on a single booking id are
/// serialized through [`BookingLocks`].
pub struct BookingService<R, C, P, N>
where
    R: BookingRepository,
    C: CatalogService,
    P: PaymentGateway,
    N: NotificationService,
{
    repository: R,
    catalog: C,
    gateway: P,
    notifier: N,
    orchestrator: SagaOrchestrator,
    confirm_step: ConfirmBooking<N>,
    locks: BookingLocks,
    timeout: Duration,
}

impl<R, C, P, N> BookingService<R, C, P, N>
where
    R: BookingRepository,
    C: CatalogService + Clone + 'static,
    P: PaymentGateway + Clone + 'static,
    N: NotificationService + Clone + 'static,
{
    /// Creates a booking service with the creation saga wired up.
    ///
    /// Registration order is execution order: validate, hold the room,
    /// process payment. Confirmation is not part of the saga; it runs
    /// only from [`confirm_booking`](Self::confirm_booking).
    pub fn new(repository: R, catalog: C, gateway: P, notifier: N, timeout: Duration) -> Self {
        let mut orchestrator = SagaOrchestrator::new();
        orchestrator.register_step(Arc::new(ValidateBooking::new()));
        orchestrator.register_step(Arc::new(HoldRoom::new(catalog.clone(), timeout)));
        orchestrator.register_step(Arc::new(ProcessPayment::new(gateway.clone(), timeout)));

        let confirm_step = ConfirmBooking::new(notifier.clone(), timeout);

        Self {
            repository,
            catalog,
            gateway,
            notifier,
            orchestrator,
            confirm_step,
            locks: BookingLocks::new(),
            timeout,
        }
    }

    /// Creates a booking and runs the creation saga.
    ///
    /// The booking is persisted whatever the saga outcome, so failed
    /// attempts stay visible with their recorded reason.
    #[tracing::instrument(
        skip(self, request),
        fields(
            guest_id = %request.guest_id,
            hotel_id = %request.hotel_id,
            room_id = %request.room_id,
        )
    )]
    pub async fn create_booking(
        &self,
        request: BookingRequest,
        payment_method: PaymentMethod,
    ) -> Result<BookingOutcome, SagaError> {
        let total_amount = match self.quote_total(&request).await {
            Ok(total) => total,
            Err(e) => return self.record_failed_quote(request, e).await,
        };

        let booking = Booking::new(request, total_amount);
        tracing::info!(
            booking_id = %booking.id(),
            total = %booking.total_amount(),
            "booking created, starting saga"
        );

        let mut ctx = SagaContext::new(booking, payment_method);
        let succeeded = self.orchestrator.execute(&mut ctx).await;
        let (booking, error) = ctx.into_parts();

        self.repository.save(&booking).await?;

        let message = if succeeded {
            "Booking created successfully. Please proceed with payment.".to_string()
        } else {
            match error {
                Some(reason) => format!("Booking failed: {reason}"),
                None => "Booking failed. Please try again.".to_string(),
            }
        };

        Ok(BookingOutcome { booking, message })
    }

    /// Confirms a booking after its payment settled.
    ///
    /// Requires the booking to be awaiting payment. The gateway reference
    /// is stamped on the booking before the confirmation step runs.
    #[tracing::instrument(skip(self, payment_ref))]
    pub async fn confirm_booking(
        &self,
        booking_id: BookingId,
        payment_ref: impl Into<String> + Send,
    ) -> Result<BookingOutcome, SagaError> {
        let _guard = self.locks.lock(booking_id).await;

        let mut booking = self.load(booking_id).await?;
        if !booking.status().can_confirm() {
            return Err(BookingError::InvalidTransition {
                status: booking.status(),
                action: "confirm",
            }
            .into());
        }

        booking.set_payment_ref(payment_ref);
        let mut ctx = SagaContext::for_confirmation(booking);
        self.confirm_step.execute(&mut ctx).await?;
        let (booking, _) = ctx.into_parts();

        self.repository.save(&booking).await?;
        tracing::info!(booking_id = %booking.id(), "booking confirmed");

        Ok(BookingOutcome {
            booking,
            message: "Booking confirmed successfully".to_string(),
        })
    }

    /// Cancels a booking and refunds any settled payment.
    ///
    /// The refund and the guest notification are best effort; the
    /// cancellation stands even when they fail.
    #[tracing::instrument(skip(self, reason))]
    pub async fn cancel_booking(
        &self,
        booking_id: BookingId,
        reason: impl Into<String> + Send,
    ) -> Result<BookingOutcome, SagaError> {
        let _guard = self.locks.lock(booking_id).await;

        let mut booking = self.load(booking_id).await?;
        booking.cancel(reason)?;
        self.repository.save(&booking).await?;

        if let Some(payment_ref) = booking.payment_ref().map(str::to_string) {
            match with_timeout(
                "payment gateway",
                self.timeout,
                self.gateway.refund(&payment_ref, booking.total_amount()),
            )
            .await
            {
                Ok(outcome) if outcome.success => {
                    tracing::info!(booking_id = %booking.id(), %payment_ref, "payment refunded");
                }
                Ok(_) => {
                    tracing::warn!(booking_id = %booking.id(), %payment_ref, "refund declined");
                }
                Err(e) => {
                    tracing::error!(booking_id = %booking.id(), error = %e, "refund failed");
                }
            }
        }

        self.notify_guest(&booking, NotificationKind::BookingCancelled, "Booking Cancelled")
            .await;

        tracing::info!(booking_id = %booking.id(), "booking cancelled");
        Ok(BookingOutcome {
            booking,
            message: "Booking cancelled successfully".to_string(),
        })
    }

    /// Puts an active booking on hold for manual review.
    ///
    /// The reason is logged but not stored; a hold is an operational
    /// pause, not a lifecycle outcome.
    #[tracing::instrument(skip(self, reason))]
    pub async fn hold_booking(
        &self,
        booking_id: BookingId,
        reason: impl Into<String> + Send,
    ) -> Result<BookingOutcome, SagaError> {
        let reason = reason.into();
        let _guard = self.locks.lock(booking_id).await;

        let mut booking = self.load(booking_id).await?;
        booking.put_on_hold()?;
        self.repository.save(&booking).await?;

        tracing::info!(booking_id = %booking.id(), %reason, "booking placed on hold");
        Ok(BookingOutcome {
            booking,
            message: "Booking placed on hold".to_string(),
        })
    }

    /// Resumes a booking that was on hold.
    #[tracing::instrument(skip(self))]
    pub async fn resume_booking(&self, booking_id: BookingId) -> Result<BookingOutcome, SagaError> {
        let _guard = self.locks.lock(booking_id).await;

        let mut booking = self.load(booking_id).await?;
        booking.resume()?;
        self.repository.save(&booking).await?;

        tracing::info!(booking_id = %booking.id(), "booking resumed");
        Ok(BookingOutcome {
            booking,
            message: "Booking resumed".to_string(),
        })
    }

    /// Rejects a booking, recording the reason on the booking.
    #[tracing::instrument(skip(self, reason))]
    pub async fn reject_booking(
        &self,
        booking_id: BookingId,
        reason: impl Into<String> + Send,
    ) -> Result<BookingOutcome, SagaError> {
        let _guard = self.locks.lock(booking_id).await;

        let mut booking = self.load(booking_id).await?;
        booking.reject(reason)?;
        self.repository.save(&booking).await?;

        self.notify_guest(&booking, NotificationKind::BookingRejected, "Booking Rejected")
            .await;

        tracing::info!(booking_id = %booking.id(), "booking rejected");
        Ok(BookingOutcome {
            booking,
            message: "Booking rejected".to_string(),
        })
    }

    /// Loads a booking by id.
    pub async fn get_booking(&self, booking_id: BookingId) -> Result<Booking, SagaError> {
        self.load(booking_id).await
    }

    /// All bookings, oldest first.
    pub async fn all_bookings(&self) -> Result<Vec<Booking>, SagaError> {
        Ok(self.repository.find_all().await?)
    }

    /// Bookings made by a guest, oldest first.
    pub async fn bookings_for_guest(&self, guest_id: GuestId) -> Result<Vec<Booking>, SagaError> {
        Ok(self.repository.find_by_guest(guest_id).await?)
    }

    /// Bookings at a hotel, oldest first.
    pub async fn bookings_for_hotel(&self, hotel_id: HotelId) -> Result<Vec<Booking>, SagaError> {
        Ok(self.repository.find_by_hotel(hotel_id).await?)
    }

    /// Hotels where the guest has a finished stay, each listed once.
    ///
    /// A stay counts once the booking was confirmed, or completed by
    /// housekeeping, and its checkout date has passed.
    pub async fn completed_hotels_for_guest(
        &self,
        guest_id: GuestId,
    ) -> Result<Vec<HotelId>, SagaError> {
        let today = Utc::now().date_naive();
        let mut hotels: Vec<HotelId> = Vec::new();

        for booking in self.repository.find_by_guest(guest_id).await? {
            let stayed = matches!(
                booking.status(),
                BookingStatus::Confirmed | BookingStatus::Completed
            );
            if stayed && booking.check_out() < today && !hotels.contains(&booking.hotel_id()) {
                hotels.push(booking.hotel_id());
            }
        }

        Ok(hotels)
    }

    /// Runs one housekeeping sweep.
    ///
    /// Expires unpaid bookings whose payment deadline passed and completes
    /// confirmed stays whose checkout date passed. Bookings on hold are
    /// exempt from expiry. Each candidate is re-read under its lock so a
    /// concurrent admin action wins.
    #[tracing::instrument(skip(self))]
    pub async fn run_housekeeping(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HousekeepingReport, SagaError> {
        let mut report = HousekeepingReport::default();

        for status in [
            BookingStatus::Pending,
            BookingStatus::RoomHeld,
            BookingStatus::PaymentPending,
        ] {
            for candidate in self.repository.find_by_status(status).await? {
                if !candidate.is_expired_at(now) {
                    continue;
                }
                let _guard = self.locks.lock(candidate.id()).await;
                let Some(mut booking) = self.repository.find_by_id(candidate.id()).await? else {
                    continue;
                };
                if booking.status() != status || !booking.is_expired_at(now) {
                    continue;
                }
                if let Err(e) = booking.expire() {
                    tracing::warn!(booking_id = %booking.id(), error = %e, "expiry skipped");
                    continue;
                }
                self.repository.save(&booking).await?;
                report.expired += 1;
                tracing::info!(booking_id = %booking.id(), "booking expired");
            }
        }

        let today = now.date_naive();
        for candidate in self
            .repository
            .find_by_status(BookingStatus::Confirmed)
            .await?
        {
            if candidate.check_out() >= today {
                continue;
            }
            let _guard = self.locks.lock(candidate.id()).await;
            let Some(mut booking) = self.repository.find_by_id(candidate.id()).await? else {
                continue;
            };
            if booking.status() != BookingStatus::Confirmed || booking.check_out() >= today {
                continue;
            }
            if let Err(e) = booking.complete_stay() {
                tracing::warn!(booking_id = %booking.id(), error = %e, "completion skipped");
                continue;
            }
            self.repository.save(&booking).await?;
            report.completed += 1;
            tracing::info!(booking_id = %booking.id(), "stay completed");
        }

        metrics::counter!("bookings_expired_total").increment(report.expired as u64);
        metrics::counter!("bookings_completed_total").increment(report.completed as u64);
        tracing::info!(
            expired = report.expired,
            completed = report.completed,
            "housekeeping sweep finished"
        );

        Ok(report)
    }

    /// Prices the stay from the catalog's nightly rate.
    async fn quote_total(&self, request: &BookingRequest) -> Result<Money, SagaError> {
        let rate = with_timeout(
            "catalog",
            self.timeout,
            self.catalog.room_rate(request.room_id),
        )
        .await?;
        let nights = request.nights().max(0) as u32;
        Ok(rate.multiply(nights))
    }

    /// Persists a failed booking when pricing was not even possible.
    async fn record_failed_quote(
        &self,
        request: BookingRequest,
        error: SagaError,
    ) -> Result<BookingOutcome, SagaError> {
        let mut booking = Booking::new(request, Money::zero());
        booking.fail()?;
        self.repository.save(&booking).await?;

        tracing::warn!(booking_id = %booking.id(), error = %error, "rate lookup failed");
        Ok(BookingOutcome {
            booking,
            message: format!("Booking failed: {error}"),
        })
    }

    /// Loads a booking or reports it missing.
    async fn load(&self, booking_id: BookingId) -> Result<Booking, SagaError> {
        self.repository
            .find_by_id(booking_id)
            .await?
            .ok_or(SagaError::BookingNotFound(booking_id))
    }

    /// Delivers a guest notification, logging failures instead of
    /// propagating them.
    async fn notify_guest(&self, booking: &Booking, kind: NotificationKind, title: &str) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::InMemoryCatalogService;
    use crate::services::notifier::InMemoryNotificationService;
    use crate::services::payment::InMemoryPaymentGateway;
    use chrono::Duration as ChronoDuration;
    use common::RoomId;
    use store::InMemoryBookingStore;

    type TestService = BookingService<
        InMemoryBookingStore,
        InMemoryCatalogService,
        InMemoryPaymentGateway,
        InMemoryNotificationService,
    >;

    fn setup() -> (
        TestService,
        InMemoryBookingStore,
        InMemoryCatalogService,
        InMemoryPaymentGateway,
        InMemoryNotificationService,
    ) {
        let store = InMemoryBookingStore::new();
        let catalog = InMemoryCatalogService::new();
        let gateway = InMemoryPaymentGateway::new();
        let notifier = InMemoryNotificationService::new();

        let service = BookingService::new(
            store.clone(),
            catalog.clone(),
            gateway.clone(),
            notifier.clone(),
            Duration::from_secs(1),
        );

        (service, store, catalog, gateway, notifier)
    }

    fn stay_request() -> BookingRequest {
        let check_in = Utc::now().date_naive() + ChronoDuration::days(7);
        BookingRequest::new(
            GuestId::new(),
            HotelId::new(),
            RoomId::new(),
            check_in,
            check_in + ChronoDuration::days(2),
            2,
        )
    }

    #[tokio::test]
    async fn test_create_booking_awaits_payment() {
        let (service, store, catalog, _, _) = setup();

        let outcome = service
            .create_booking(stay_request(), PaymentMethod::Stripe)
            .await
            .unwrap();

        assert_eq!(outcome.booking.status(), BookingStatus::PaymentPending);
        assert_eq!(
            outcome.message,
            "Booking created successfully. Please proceed with payment."
        );
        // Two nights at the default rate.
        assert_eq!(outcome.booking.total_amount(), Money::from_cents(30_000));
        assert!(catalog.is_held(outcome.booking.room_id()));

        let stored = store.find_by_id(outcome.booking.id()).await.unwrap();
        assert_eq!(stored, Some(outcome.booking));
    }

    #[tokio::test]
    async fn test_create_booking_with_mock_payment_confirms() {
        let (service, _, _, _, _) = setup();

        let outcome = service
            .create_booking(stay_request(), PaymentMethod::Mock)
            .await
            .unwrap();

        assert_eq!(outcome.booking.status(), BookingStatus::Confirmed);
        assert!(outcome.booking.payment_ref().unwrap().starts_with("MOCK-"));
    }

    #[tokio::test]
    async fn test_rejected_hold_fails_the_booking() {
        let (service, store, catalog, gateway, _) = setup();
        catalog.set_reject_holds(true);

        let outcome = service
            .create_booking(stay_request(), PaymentMethod::Stripe)
            .await
            .unwrap();

        assert_eq!(outcome.booking.status(), BookingStatus::Failed);
        assert!(outcome.message.starts_with("Booking failed:"));
        assert!(outcome.message.contains("not available"));
        assert_eq!(catalog.held_count(), 0);
        assert_eq!(gateway.refund_count(), 0);

        // Failed bookings are persisted too.
        let stored = store.find_by_id(outcome.booking.id()).await.unwrap();
        assert_eq!(stored.map(|b| b.status()), Some(BookingStatus::Failed));
    }

    #[tokio::test]
    async fn test_rate_lookup_failure_records_failed_booking() {
        let (service, store, catalog, _, _) = setup();
        catalog.set_fail_on_rate(true);

        let outcome = service
            .create_booking(stay_request(), PaymentMethod::Stripe)
            .await
            .unwrap();

        assert_eq!(outcome.booking.status(), BookingStatus::Failed);
        assert_eq!(outcome.booking.total_amount(), Money::zero());
        assert!(outcome.message.contains("Rate lookup failed"));
        assert_eq!(store.booking_count().await, 1);
        // The saga never started, so no hold was attempted.
        assert_eq!(catalog.held_count(), 0);
    }

    #[tokio::test]
    async fn test_confirm_stamps_payment_and_notifies() {
        let (service, _, _, _, notifier) = setup();

        let created = service
            .create_booking(stay_request(), PaymentMethod::Stripe)
            .await
            .unwrap();
        let outcome = service
            .confirm_booking(created.booking.id(), "PAY-0001")
            .await
            .unwrap();

        assert_eq!(outcome.booking.status(), BookingStatus::Confirmed);
        assert_eq!(outcome.booking.payment_ref(), Some("PAY-0001"));
        assert_eq!(outcome.message, "Booking confirmed successfully");
        assert_eq!(notifier.count_of(NotificationKind::BookingConfirmed), 1);
    }

    #[tokio::test]
    async fn test_confirm_requires_awaiting_payment() {
        let (service, _, _, _, _) = setup();

        let created = service
            .create_booking(stay_request(), PaymentMethod::Mock)
            .await
            .unwrap();
        let err = service
            .confirm_booking(created.booking.id(), "PAY-0001")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SagaError::Booking(BookingError::InvalidTransition { .. })
        ));
        // The stamped mock reference is untouched.
        let booking = service.get_booking(created.booking.id()).await.unwrap();
        assert!(booking.payment_ref().unwrap().starts_with("MOCK-"));
    }

    #[tokio::test]
    async fn test_confirm_unknown_booking() {
        let (service, _, _, _, _) = setup();

        let err = service
            .confirm_booking(BookingId::new(), "PAY-0001")
            .await
            .unwrap_err();
        assert!(matches!(err, SagaError::BookingNotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_refunds_settled_payment() {
        let (service, _, _, gateway, notifier) = setup();

        let created = service
            .create_booking(stay_request(), PaymentMethod::Mock)
            .await
            .unwrap();
        let outcome = service
            .cancel_booking(created.booking.id(), "Guest changed plans")
            .await
            .unwrap();

        assert_eq!(outcome.booking.status(), BookingStatus::Cancelled);
        assert_eq!(
            outcome.booking.cancellation_reason(),
            Some("Guest changed plans")
        );
        assert_eq!(gateway.refund_count(), 1);
        assert_eq!(
            gateway.last_refund_amount(),
            Some(created.booking.total_amount())
        );
        assert_eq!(notifier.count_of(NotificationKind::BookingCancelled), 1);
    }

    #[tokio::test]
    async fn test_cancel_twice_reports_already_cancelled() {
        let (service, _, _, _, _) = setup();

        let created = service
            .create_booking(stay_request(), PaymentMethod::Stripe)
            .await
            .unwrap();
        service
            .cancel_booking(created.booking.id(), "first")
            .await
            .unwrap();
        let err = service
            .cancel_booking(created.booking.id(), "second")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SagaError::Booking(BookingError::AlreadyCancelled)
        ));
        let booking = service.get_booking(created.booking.id()).await.unwrap();
        assert_eq!(booking.cancellation_reason(), Some("first"));
    }

    #[tokio::test]
    async fn test_hold_resume_round_trip() {
        let (service, _, _, _, _) = setup();

        let created = service
            .create_booking(stay_request(), PaymentMethod::Stripe)
            .await
            .unwrap();

        let held = service
            .hold_booking(created.booking.id(), "Manual fraud review")
            .await
            .unwrap();
        assert_eq!(held.booking.status(), BookingStatus::OnHold);
        assert_eq!(held.message, "Booking placed on hold");

        let resumed = service.resume_booking(created.booking.id()).await.unwrap();
        assert_eq!(resumed.booking.status(), BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_reject_records_reason_and_notifies() {
        let (service, _, _, _, notifier) = setup();

        let created = service
            .create_booking(stay_request(), PaymentMethod::Stripe)
            .await
            .unwrap();
        let outcome = service
            .reject_booking(created.booking.id(), "Suspected fraud")
            .await
            .unwrap();

        assert_eq!(outcome.booking.status(), BookingStatus::Rejected);
        assert_eq!(
            outcome.booking.cancellation_reason(),
            Some("Suspected fraud")
        );
        assert_eq!(notifier.count_of(NotificationKind::BookingRejected), 1);
    }

    #[tokio::test]
    async fn test_housekeeping_expires_stale_bookings() {
        let (service, _, _, _, _) = setup();

        let created = service
            .create_booking(stay_request(), PaymentMethod::Stripe)
            .await
            .unwrap();

        let later = Utc::now() + ChronoDuration::minutes(domain::BOOKING_EXPIRY_MINUTES + 1);
        let report = service.run_housekeeping(later).await.unwrap();

        assert_eq!(report.expired, 1);
        assert_eq!(report.completed, 0);
        let booking = service.get_booking(created.booking.id()).await.unwrap();
        assert_eq!(booking.status(), BookingStatus::Expired);
    }

    #[tokio::test]
    async fn test_housekeeping_spares_bookings_on_hold() {
        let (service, _, _, _, _) = setup();

        let created = service
            .create_booking(stay_request(), PaymentMethod::Stripe)
            .await
            .unwrap();
        service
            .hold_booking(created.booking.id(), "Manual review")
            .await
            .unwrap();

        let later = Utc::now() + ChronoDuration::minutes(domain::BOOKING_EXPIRY_MINUTES + 1);
        let report = service.run_housekeeping(later).await.unwrap();

        assert_eq!(report.expired, 0);
        let booking = service.get_booking(created.booking.id()).await.unwrap();
        assert_eq!(booking.status(), BookingStatus::OnHold);
    }
}
