use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use common::{GuestId, HotelId, RoomId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{BookingRequest, BookingStatus, PaymentMethod};
use saga::{
    BookingService, InMemoryCatalogService, InMemoryNotificationService, InMemoryPaymentGateway,
};
use store::InMemoryBookingStore;

type BenchService = BookingService<
    InMemoryBookingStore,
    InMemoryCatalogService,
    InMemoryPaymentGateway,
    InMemoryNotificationService,
>;

fn make_service(catalog: InMemoryCatalogService) -> BenchService {
    BookingService::new(
        InMemoryBookingStore::new(),
        catalog,
        InMemoryPaymentGateway::new(),
        InMemoryNotificationService::new(),
        Duration::from_secs(1),
    )
}

fn make_request() -> BookingRequest {
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

fn bench_create_booking(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("saga/create_booking_stripe", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = make_service(InMemoryCatalogService::new());
                let outcome = service
                    .create_booking(make_request(), PaymentMethod::Stripe)
                    .await
                    .unwrap();
                assert_eq!(outcome.booking.status(), BookingStatus::PaymentPending);
            });
        });
    });
}

fn bench_create_booking_mock_settlement(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("saga/create_booking_mock", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = make_service(InMemoryCatalogService::new());
                let outcome = service
                    .create_booking(make_request(), PaymentMethod::Mock)
                    .await
                    .unwrap();
                assert_eq!(outcome.booking.status(), BookingStatus::Confirmed);
            });
        });
    });
}

fn bench_compensated_booking(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("saga/create_booking_compensated", |b| {
        b.iter(|| {
            rt.block_on(async {
                let catalog = InMemoryCatalogService::new();
                catalog.set_reject_holds(true);
                let service = make_service(catalog);
                let outcome = service
                    .create_booking(make_request(), PaymentMethod::Stripe)
                    .await
                    .unwrap();
                assert_eq!(outcome.booking.status(), BookingStatus::Failed);
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create_booking,
    bench_create_booking_mock_settlement,
    bench_compensated_booking,
);
criterion_main!(benches);
