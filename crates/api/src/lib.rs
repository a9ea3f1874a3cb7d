//! HTTP API server with observability for the hotel booking platform.
//!
//! Provides REST endpoints for the booking lifecycle (create, confirm,
//! cancel, hold, resume, reject) plus listings, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use store::BookingRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::bookings::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: BookingRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/bookings", post(routes::bookings::create::<R>))
        .route("/api/bookings", get(routes::bookings::list::<R>))
        .route("/api/bookings/{id}", get(routes::bookings::get::<R>))
        .route("/api/bookings/{id}/confirm", put(routes::bookings::confirm::<R>))
        .route("/api/bookings/{id}/cancel", put(routes::bookings::cancel::<R>))
        .route("/api/bookings/{id}/hold", put(routes::bookings::hold::<R>))
        .route("/api/bookings/{id}/resume", put(routes::bookings::resume::<R>))
        .route("/api/bookings/{id}/reject", put(routes::bookings::reject::<R>))
        .route("/api/bookings/user/{user_id}", get(routes::bookings::by_user::<R>))
        .route(
            "/api/bookings/user/{user_id}/completed-hotels",
            get(routes::bookings::completed_hotels::<R>),
        )
        .route(
            "/api/bookings/hotel/{hotel_id}",
            get(routes::bookings::by_hotel::<R>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state with in-memory collaborators.
pub fn create_default_state<R: BookingRepository + 'static>(
    store: R,
    collaborator_timeout: Duration,
) -> Arc<AppState<R>> {
    use saga::{
        BookingService, InMemoryCatalogService, InMemoryNotificationService,
        InMemoryPaymentGateway,
    };

    let catalog = InMemoryCatalogService::new();
    let gateway = InMemoryPaymentGateway::new();
    let notifier = InMemoryNotificationService::new();

    let booking_service =
        BookingService::new(store, catalog, gateway, notifier, collaborator_timeout);

    Arc::new(AppState { booking_service })
}
