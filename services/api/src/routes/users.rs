//! User profile endpoints

use axum::{Extension, Json, extract::State};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    extract::{JsonBody, PathParam, QueryParams},
    middleware::CurrentUser,
    models::{Pagination, UpdateUser, UserResponse, UserUpdateRequest},
    state::AppState,
};

/// List users with `skip`/`limit` pagination
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let (skip, limit) = pagination.bounds();
    let users = state.user_store.list(skip, limit).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_store
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Update a profile; users may only update their own
pub async fn update_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i64>,
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<UserUpdateRequest>,
) -> ApiResult<Json<UserResponse>> {
    if current_user.id != user_id {
        warn!(
            "User {} attempted to update profile of user {}",
            current_user.id, user_id
        );
        return Err(ApiError::Forbidden("Not authorized to update this user"));
    }

    let user = state
        .user_store
        .update_profile(user_id, &UpdateUser::from(payload))
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    info!("Updated profile of user {}", user.id);
    Ok(Json(UserResponse::from(user)))
}
