//! Authentication Handlers
//!
//! Registration, login and the current-user lookup.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{LoginRequest, RegisterRequest, UserPublic};
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPublic,
}

/// POST /api/auth/register - create an account and sign it in
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    req.validate()?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.create(req).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::conflict(msg),
        other => AppError::database(other.to_string()),
    })?;

    issue_token(&state, user)
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_email(&req.email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // Fixed delay before inspecting the result, so hits and misses
    // take the same time
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => u,
        None => {
            tracing::warn!(target: "security", email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !user.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        tracing::warn!(target: "security", email = %req.email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    issue_token(&state, user)
}

/// GET /api/auth/me - identity behind the presented token
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<UserPublic>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

fn issue_token(
    state: &ServerState,
    user: crate::db::models::User,
) -> AppResult<Json<AuthResponse>> {
    let user_id = user
        .id
        .as_ref()
        .map(|t| t.id.to_raw())
        .unwrap_or_default();

    let token = state
        .jwt_service
        .generate_token(&user_id, &user.username, &user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
