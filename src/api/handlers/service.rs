use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateServiceRequest, UpdateServiceRequest};
use crate::api::extractors::auth::AdminUser;
use crate::domain::models::service::{NewServiceParams, Service};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list_active().await?;
    Ok(Json(services))
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = state
        .service_repo
        .find_by_id(&service_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| AppError::NotFound("Service not found".into()))?;
    Ok(Json(service))
}

pub async fn list_all_services(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list_all().await?;
    Ok(Json(services))
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.duration_min <= 0 {
        return Err(AppError::Validation("duration_min must be positive".into()));
    }
    if payload.price_cents < 0 {
        return Err(AppError::Validation("price_cents must not be negative".into()));
    }

    let service = Service::new(NewServiceParams {
        name: payload.name,
        description: payload.description,
        category: payload.category,
        duration_min: payload.duration_min,
        price_cents: payload.price_cents,
    });

    let created = state.service_repo.create(&service).await?;
    info!("Service created: {} ({})", created.name, created.id);
    Ok(Json(created))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(service_id): Path<String>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut service = state
        .service_repo
        .find_by_id(&service_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".into()))?;

    if let Some(name) = payload.name {
        service.name = name;
    }
    if let Some(description) = payload.description {
        service.description = description;
    }
    if let Some(category) = payload.category {
        service.category = category;
    }
    if let Some(duration_min) = payload.duration_min {
        if duration_min <= 0 {
            return Err(AppError::Validation("duration_min must be positive".into()));
        }
        service.duration_min = duration_min;
    }
    if let Some(price_cents) = payload.price_cents {
        if price_cents < 0 {
            return Err(AppError::Validation("price_cents must not be negative".into()));
        }
        // Existing bookings keep their snapshotted price.
        service.price_cents = price_cents;
    }
    if let Some(is_active) = payload.is_active {
        service.is_active = is_active;
    }

    let updated = state.service_repo.update(&service).await?;
    info!("Service updated: {}", updated.id);
    Ok(Json(updated))
}
