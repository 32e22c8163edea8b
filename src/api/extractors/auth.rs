use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

/// Bearer-token guard for the admin surface. The back office is a single
/// operator, so a shared token from config is the whole auth story.
pub struct AdminUser;

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_val = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?;

        let token = header_val
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        if app_state.config.admin_token.is_empty() || token != app_state.config.admin_token {
            return Err(AppError::Unauthorized);
        }

        Ok(AdminUser)
    }
}
