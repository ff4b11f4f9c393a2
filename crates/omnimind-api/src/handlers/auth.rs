//! Account lifecycle HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};

use omnimind_core::{LoginRequest, RegisterRequest, UpdateProfileRequest, UserProfile};

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::{validate, ApiError, AppState};

/// Register a new account and issue a token.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    validate::email(&req.email)?;
    validate::password(&req.password)?;
    validate::name(&req.name)?;

    let email = req.email.trim().to_lowercase();
    if state.db.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .db
        .users
        .create(&email, req.name.trim(), &password_hash, &req.timezone)
        .await?;

    let token = state.auth.issue(user.id, &user.email)?;
    info!(user_id = %user.id, "New user registered");

    // Best-effort welcome email; registration succeeds regardless.
    if state.mailer.is_enabled() {
        let mailer = state.mailer.clone();
        let to = user.email.clone();
        let name = user.name.clone();
        let dashboard_url = format!("{}/dashboard", state.client_url);
        tokio::spawn(async move {
            if let Err(e) = mailer.send_welcome(&to, &name, &dashboard_url).await {
                warn!(error = %e, "Failed to send welcome email");
            }
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "user": UserProfile::from(&user),
            "token": token,
        })),
    ))
}

/// Log in with email and password.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = req.email.trim().to_lowercase();

    // One uniform error for unknown email and bad password.
    let user = state
        .db
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    state.db.users.record_login(user.id).await?;
    let token = state.auth.issue(user.id, &user.email)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(serde_json::json!({
        "success": true,
        "user": UserProfile::from(&user),
        "token": token,
    })))
}

/// Return the authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .db
        .users
        .get(auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "user": UserProfile::from(&user),
    })))
}

/// Update profile fields.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(name) = &req.name {
        validate::name(name)?;
    }

    let user = state.db.users.update_profile(auth.id, &req).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "user": UserProfile::from(&user),
    })))
}

/// Issue a fresh token for an authenticated caller.
pub async fn refresh_token(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = state.auth.issue(auth.id, &auth.email)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "token": token,
    })))
}
