//! User API Handlers
//!
//! Account management. Listing and deletion are admin-only; reads and
//! edits of a single account follow the self-or-admin rule.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::catalog::Pagination;
use crate::core::ServerState;
use crate::db::models::{UserPublic, UserUpdate};
use crate::db::repository::{RepoError, UserRepository, strip_table_prefix};
use crate::utils::{AppError, AppResult, validation::parse_bounded_int};

const USERS_DEFAULT_LIMIT: u32 = 20;
const USERS_MAX_LIMIT: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserPublic>,
    pub pagination: Pagination,
}

fn map_repo_error(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Duplicate(msg) => AppError::conflict(msg),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Database(msg) => AppError::database(msg),
    }
}

/// The caller may touch the account if it is their own or they are admin
fn check_self_or_admin(current: &CurrentUser, target_id: &str) -> AppResult<()> {
    let target_key = strip_table_prefix("user", target_id);
    let own_key = strip_table_prefix("user", &current.id);
    if current.is_admin() || target_key == own_key {
        Ok(())
    } else {
        Err(AppError::forbidden("Cannot access another user's account"))
    }
}

/// GET /api/users - admin-only paged listing
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<UserListResponse>> {
    let page = parse_bounded_int(params.page.as_deref(), "page", 1, u32::MAX, 1)?;
    let limit = parse_bounded_int(
        params.limit.as_deref(),
        "limit",
        1,
        USERS_MAX_LIMIT,
        USERS_DEFAULT_LIMIT,
    )?;

    let repo = UserRepository::new(state.get_db());
    let (users, total) = repo
        .find_page((page - 1) * limit, limit)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, limit, total),
    }))
}

/// GET /api/users/{id} - self or admin
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserPublic>> {
    check_self_or_admin(&current, &id)?;

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

/// PUT /api/users/{id} - self or admin; role and active flags admin-only
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserPublic>> {
    check_self_or_admin(&current, &id)?;
    payload.validate()?;

    if !current.is_admin() && (payload.role.is_some() || payload.is_active.is_some()) {
        return Err(AppError::forbidden("Only admins can change role or status"));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo.update(&id, payload).await.map_err(map_repo_error)?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/{id} - admin only
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    // An admin removing their own account would lock them out mid-session
    let target_key = strip_table_prefix("user", &id);
    if target_key == strip_table_prefix("user", &current.id) {
        return Err(AppError::validation("Cannot delete your own account"));
    }

    let repo = UserRepository::new(state.get_db());
    repo.delete(&id).await.map_err(map_repo_error)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
