use axum::{extract::{Query, State}, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use crate::api::dtos::{requests::AvailabilityQuery, responses::AvailabilityResponse};
use crate::domain::services::availability::calculate_slots;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))?;

    let service = state
        .service_repo
        .find_by_id(&query.service_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| AppError::Validation("Unknown or inactive service".into()))?;

    let existing = state.booking_repo.list_active_by_date(date).await?;

    let slots = calculate_slots(
        date,
        service.duration_min as i64,
        state.config.business_hours(),
        state.config.slot_interval_min,
        &existing,
        Utc::now(),
        state.config.business_timezone,
    );

    Ok(Json(AvailabilityResponse {
        date: query.date,
        slots,
    }))
}
