use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateContactRequest, UpdateContactStatusRequest};
use crate::api::extractors::auth::AdminUser;
use crate::domain::models::contact::{Contact, NewContactParams};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::Validation("Message must not be empty".into()));
    }

    let contact = Contact::new(NewContactParams {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone: payload.phone,
        inquiry_type: payload.inquiry_type,
        message: payload.message,
    });

    let created = state.contact_repo.create(&contact).await?;
    info!("Contact inquiry received: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let contacts = state.contact_repo.list().await?;
    Ok(Json(contacts))
}

pub async fn update_contact_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(contact_id): Path<String>,
    Json(payload): Json<UpdateContactStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let contact = state
        .contact_repo
        .update_status(&contact_id, payload.status)
        .await?;
    Ok(Json(contact))
}
