//! Authentication middleware for bearer token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;

use crate::{error::ApiError, models::User, state::AppState};

pub const NOT_AUTHENTICATED: &str = "Not authenticated";
pub const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// The user a request was authenticated as
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication middleware
///
/// Verifies the bearer token, loads the user named by its subject and stores
/// it in the request extensions as [`CurrentUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthorized(NOT_AUTHENTICATED))?;

    let email = state.jwt_service.verify(bearer.token()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized(INVALID_CREDENTIALS)
    })?;

    let user = state
        .user_store
        .find_by_email(&email)
        .await?
        .ok_or_else(|| {
            warn!("Token subject {} has no matching user", email);
            ApiError::Unauthorized(INVALID_CREDENTIALS)
        })?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
