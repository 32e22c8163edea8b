use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{
    CreateBookingRequest, RescheduleBookingRequest, UpdateBookingStatusRequest,
};
use crate::api::dtos::responses::BookingCreatedResponse;
use crate::api::extractors::auth::AdminUser;
use crate::domain::models::booking::CancelActor;
use crate::domain::services::booking_service::CreateBookingArgs;
use crate::error::AppError;
use crate::state::AppState;

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

/// Accepts either local "HH:MM" or a full RFC3339 timestamp, which is
/// converted into the business time zone first.
fn parse_time(raw: &str, tz: Tz) -> Result<NaiveTime, AppError> {
    if raw.contains('T') {
        let dt = chrono::DateTime::parse_from_rfc3339(raw)
            .map_err(|_| AppError::Validation("Invalid ISO time format".into()))?;
        Ok(dt.with_timezone(&tz).time())
    } else {
        NaiveTime::parse_from_str(raw, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))
    }
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&payload.date)?;
    let time = parse_time(&payload.time, state.config.business_timezone)?;

    let booking = state
        .booking_service
        .create_booking(CreateBookingArgs {
            first_name: payload.customer_first_name,
            last_name: payload.customer_last_name,
            email: payload.customer_email,
            phone: payload.customer_phone,
            service_id: payload.service_id,
            date,
            time,
            notes: payload.notes,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            booking_id: booking.id,
            status: booking.status,
            payment_status: booking.payment_status,
            total_price_cents: booking.total_price_cents,
        }),
    ))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_service
        .cancel(&booking_id, CancelActor::Customer)
        .await?;
    Ok(Json(booking))
}

pub async fn reschedule_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<RescheduleBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_date = parse_date(&payload.new_date)?;
    let new_time = parse_time(&payload.new_time, state.config.business_timezone)?;

    let booking = state
        .booking_service
        .reschedule(&booking_id, new_date, new_time)
        .await?;
    Ok(Json(booking))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_all().await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(&booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_service
        .update_status(&booking_id, payload.status)
        .await?;
    Ok(Json(booking))
}

pub async fn admin_cancel_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_service
        .cancel(&booking_id, CancelActor::Admin)
        .await?;
    Ok(Json(booking))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.booking_service.delete(&booking_id).await?;
    info!("Booking deleted by admin: {}", booking_id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
