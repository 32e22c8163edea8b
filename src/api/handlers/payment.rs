use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::PaymentOutcomeRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Inbound hook from the payment bridge. Capture mechanics (intents,
/// signatures) live with the provider; only the outcome reaches the core.
pub async fn payment_outcome(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PaymentOutcomeRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "Payment outcome for booking {}: {:?}",
        payload.booking_id, payload.outcome
    );
    let booking = state
        .booking_service
        .record_payment_outcome(&payload.booking_id, payload.outcome)
        .await?;
    Ok(Json(booking))
}
