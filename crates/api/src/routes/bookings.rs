//! Booking lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::NaiveDate;
use common::{BookingId, GuestId, HotelId, RoomId};
use domain::{Booking, BookingRequest, BookingStatus, PaymentMethod};
use saga::{
    BookingOutcome, BookingService, InMemoryCatalogService, InMemoryNotificationService,
    InMemoryPaymentGateway,
};
use serde::{Deserialize, Serialize};
use store::BookingRepository;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<R: BookingRepository> {
    pub booking_service: BookingService<
        R,
        InMemoryCatalogService,
        InMemoryPaymentGateway,
        InMemoryNotificationService,
    >,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub guest_id: String,
    pub hotel_id: String,
    pub room_id: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub payment_method: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmBookingRequest {
    pub payment_id: String,
}

#[derive(Deserialize, Default)]
pub struct ReasonRequest {
    pub reason: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub guest_id: String,
    pub hotel_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub status: BookingStatus,
    pub total_cents: i64,
    pub payment_ref: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: String,
    pub expires_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BookingResponse {
    fn from_booking(booking: &Booking) -> Self {
        Self {
            id: booking.id().to_string(),
            guest_id: booking.guest_id().to_string(),
            hotel_id: booking.hotel_id().to_string(),
            room_id: booking.room_id().to_string(),
            check_in: booking.check_in(),
            check_out: booking.check_out(),
            guests: booking.guests(),
            status: booking.status(),
            total_cents: booking.total_amount().cents(),
            payment_ref: booking.payment_ref().map(String::from),
            cancellation_reason: booking.cancellation_reason().map(String::from),
            created_at: booking.created_at().to_rfc3339(),
            expires_at: booking.expires_at().to_rfc3339(),
            message: None,
        }
    }

    fn from_outcome(outcome: BookingOutcome) -> Self {
        let mut response = Self::from_booking(&outcome.booking);
        response.message = Some(outcome.message);
        response
    }
}

// -- Handlers --

/// POST /api/bookings — run the creation saga for a new booking.
///
/// Always answers 201 when the saga ran: a failed run is reported in-band
/// through the response's FAILED status and failure message.
#[tracing::instrument(skip(state, req))]
pub async fn create<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(axum::http::StatusCode, Json<BookingResponse>), ApiError> {
    let request = BookingRequest::new(
        GuestId::from_uuid(parse_uuid(&req.guest_id, "guest_id")?),
        HotelId::from_uuid(parse_uuid(&req.hotel_id, "hotel_id")?),
        RoomId::from_uuid(parse_uuid(&req.room_id, "room_id")?),
        parse_date(&req.check_in, "check_in")?,
        parse_date(&req.check_out, "check_out")?,
        req.guests,
    );
    let payment_method = parse_payment_method(req.payment_method.as_deref())?;

    let outcome = state
        .booking_service
        .create_booking(request, payment_method)
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(BookingResponse::from_outcome(outcome)),
    ))
}

/// PUT /api/bookings/:id/confirm — confirm a booking after payment completed.
#[tracing::instrument(skip(state, req))]
pub async fn confirm<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    Json(req): Json<ConfirmBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let outcome = state
        .booking_service
        .confirm_booking(booking_id, req.payment_id)
        .await?;
    Ok(Json(BookingResponse::from_outcome(outcome)))
}

/// PUT /api/bookings/:id/cancel — cancel a booking.
#[tracing::instrument(skip(state, req))]
pub async fn cancel<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let reason = req
        .reason
        .unwrap_or_else(|| "User requested cancellation".to_string());
    let outcome = state.booking_service.cancel_booking(booking_id, reason).await?;
    Ok(Json(BookingResponse::from_outcome(outcome)))
}

/// PUT /api/bookings/:id/hold — pause a booking for admin review.
#[tracing::instrument(skip(state, req))]
pub async fn hold<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let reason = req
        .reason
        .unwrap_or_else(|| "Admin put booking on hold".to_string());
    let outcome = state.booking_service.hold_booking(booking_id, reason).await?;
    Ok(Json(BookingResponse::from_outcome(outcome)))
}

/// PUT /api/bookings/:id/resume — resume a held booking.
#[tracing::instrument(skip(state))]
pub async fn resume<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let outcome = state.booking_service.resume_booking(booking_id).await?;
    Ok(Json(BookingResponse::from_outcome(outcome)))
}

/// PUT /api/bookings/:id/reject — reject a booking.
#[tracing::instrument(skip(state, req))]
pub async fn reject<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let reason = req
        .reason
        .unwrap_or_else(|| "Admin rejected booking".to_string());
    let outcome = state.booking_service.reject_booking(booking_id, reason).await?;
    Ok(Json(BookingResponse::from_outcome(outcome)))
}

/// GET /api/bookings/:id — load a booking by id.
#[tracing::instrument(skip(state))]
pub async fn get<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let booking = state.booking_service.get_booking(booking_id).await?;
    Ok(Json(BookingResponse::from_booking(&booking)))
}

/// GET /api/bookings — list every booking.
#[tracing::instrument(skip(state))]
pub async fn list<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = state.booking_service.all_bookings().await?;
    Ok(Json(
        bookings.iter().map(BookingResponse::from_booking).collect(),
    ))
}

/// GET /api/bookings/user/:user_id — list a guest's bookings.
#[tracing::instrument(skip(state))]
pub async fn by_user<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let guest_id = GuestId::from_uuid(parse_uuid(&user_id, "user id")?);
    let bookings = state.booking_service.bookings_for_guest(guest_id).await?;
    Ok(Json(
        bookings.iter().map(BookingResponse::from_booking).collect(),
    ))
}

/// GET /api/bookings/user/:user_id/completed-hotels — hotels with finished
/// stays, for review eligibility.
#[tracing::instrument(skip(state))]
pub async fn completed_hotels<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<HotelId>>, ApiError> {
    let guest_id = GuestId::from_uuid(parse_uuid(&user_id, "user id")?);
    let hotels = state
        .booking_service
        .completed_hotels_for_guest(guest_id)
        .await?;
    Ok(Json(hotels))
}

/// GET /api/bookings/hotel/:hotel_id — list a hotel's bookings.
#[tracing::instrument(skip(state))]
pub async fn by_hotel<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(hotel_id): Path<String>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let hotel_id = HotelId::from_uuid(parse_uuid(&hotel_id, "hotel id")?);
    let bookings = state.booking_service.bookings_for_hotel(hotel_id).await?;
    Ok(Json(
        bookings.iter().map(BookingResponse::from_booking).collect(),
    ))
}

fn parse_booking_id(id: &str) -> Result<BookingId, ApiError> {
    Ok(BookingId::from_uuid(parse_uuid(id, "booking id")?))
}

fn parse_uuid(value: &str, field: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| ApiError::BadRequest(format!("Invalid {field}: {e}")))
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, ApiError> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| ApiError::BadRequest(format!("Invalid {field}: {e}")))
}

fn parse_payment_method(value: Option<&str>) -> Result<PaymentMethod, ApiError> {
    match value {
        None => Ok(PaymentMethod::Stripe),
        Some(raw) => match raw.to_ascii_uppercase().as_str() {
            "MOCK" => Ok(PaymentMethod::Mock),
            "STRIPE" => Ok(PaymentMethod::Stripe),
            "PAYPAL" => Ok(PaymentMethod::Paypal),
            other => Err(ApiError::BadRequest(format!(
                "Unknown payment method: {other}"
            ))),
        },
    }
}
