//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::BookingError;
use saga::SagaError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Booking lifecycle error.
    Booking(BookingError),
    /// Saga or collaborator error.
    Saga(SagaError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Booking(err) => booking_error_to_response(&err),
            ApiError::Saga(err) => saga_error_to_response(&err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn booking_error_to_response(err: &BookingError) -> (StatusCode, String) {
    match err {
        BookingError::InvalidTransition { .. } | BookingError::AlreadyCancelled => {
            (StatusCode::CONFLICT, err.to_string())
        }
        BookingError::InvalidStayDates
        | BookingError::CheckInInPast
        | BookingError::InvalidGuestCount { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
    }
}

fn saga_error_to_response(err: &SagaError) -> (StatusCode, String) {
    match err {
        SagaError::BookingNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        SagaError::Booking(inner) => booking_error_to_response(inner),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}
