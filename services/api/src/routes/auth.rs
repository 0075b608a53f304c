//! Registration, login and account endpoints

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    extract::{FormBody, JsonBody},
    middleware::CurrentUser,
    models::{
        ChangePasswordRequest, LoginForm, MessageResponse, NewUser, PasswordResetConfirm,
        PasswordResetRequest, RegisterRequest, RegisterResponse, TokenResponse, User,
        UserResponse,
    },
    password::Verification,
    state::AppState,
    validation::validate_email,
};

const INCORRECT_CREDENTIALS: &str = "Incorrect email or password";
const RESET_REQUESTED: &str = "If your email is registered, you will receive a password reset link";

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_email(&payload.email).map_err(ApiError::Validation)?;

    if state
        .user_store
        .find_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = state
        .passwords
        .hash_blocking(payload.password)
        .await
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?;

    let user = state
        .user_store
        .create(&NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await?;

    info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(RegisterResponse::from(user))))
}

/// OAuth2 password-grant login; the `username` field carries the email
pub async fn login(
    State(state): State<AppState>,
    FormBody(form): FormBody<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    info!("Login attempt for user: {}", form.username);

    let user = authenticate(&state, &form.username, form.password)
        .await?
        .ok_or(ApiError::Unauthorized(INCORRECT_CREDENTIALS))?;

    let access_token = state
        .jwt_service
        .generate_access_token(&user.email)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(TokenResponse::bearer(access_token)))
}

/// Look up a user and check the password; `None` for either failure
async fn authenticate(state: &AppState, email: &str, password: String) -> ApiResult<Option<User>> {
    let Some(user) = state.user_store.find_by_email(email).await? else {
        if let Err(e) = state.passwords.check_decoy_blocking(password).await {
            error!("Decoy password check failed: {}", e);
        }
        return Ok(None);
    };

    let verification = state
        .passwords
        .check_blocking(password.clone(), user.password.clone())
        .await
        .unwrap_or_else(|e| {
            error!("Unusable password digest for user {}: {}", user.id, e);
            Verification::Invalid
        });

    match verification {
        Verification::Invalid => Ok(None),
        Verification::Valid => Ok(Some(user)),
        Verification::ValidNeedsRehash => {
            upgrade_digest(state, &user, password).await;
            Ok(Some(user))
        }
    }
}

// Best effort: a failed upgrade leaves the old digest, which still verifies.
async fn upgrade_digest(state: &AppState, user: &User, password: String) {
    let result = match state.passwords.hash_blocking(password).await {
        Ok(digest) => state
            .user_store
            .update_password(user.id, &digest)
            .await
            .map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => info!("Upgraded password digest for user {}", user.id),
        Err(e) => warn!("Failed to upgrade password digest for user {}: {}", user.id, e),
    }
}

/// Current user profile
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// Logout is client-side: tokens stay valid until they expire
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Successfully logged out"))
}

/// Change the password of the authenticated user
pub async fn change_password(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let current_ok = state
        .passwords
        .check_blocking(payload.current_password, user.password.clone())
        .await
        .map(Verification::is_valid)
        .unwrap_or_else(|e| {
            error!("Unusable password digest for user {}: {}", user.id, e);
            false
        });

    if !current_ok {
        return Err(ApiError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = state
        .passwords
        .hash_blocking(payload.new_password)
        .await
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .user_store
        .update_password(user.id, &password_hash)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    info!("Password changed for user {}", user.id);
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Request a password reset link
///
/// The answer is the same whether or not the email is registered. No reset
/// token is issued and no email is sent.
pub async fn request_password_reset(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<PasswordResetRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate_email(&payload.email).map_err(ApiError::Validation)?;

    if state
        .user_store
        .find_by_email(&payload.email)
        .await?
        .is_none()
    {
        info!("Password reset requested for unknown email");
    }

    Ok(Json(MessageResponse::new(RESET_REQUESTED)))
}

/// Confirm a password reset; the token is not checked and nothing changes
pub async fn confirm_password_reset(
    JsonBody(_payload): JsonBody<PasswordResetConfirm>,
) -> Json<MessageResponse> {
    Json(MessageResponse::new("Password has been reset successfully"))
}
