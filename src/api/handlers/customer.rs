use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::extractors::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let customers = state.customer_repo.list().await?;
    Ok(Json(customers))
}
