//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::products::ProductListResponse;
use crate::auth::CurrentUser;
use crate::catalog::{ListParams, Pagination, build_query};
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::{CategoryRepository, ProductRepository, RepoError, UserRepository};
use crate::utils::{AppError, AppResult, validation::is_valid_record_key};

fn map_repo_error(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Duplicate(msg) => AppError::conflict(msg),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Database(msg) => AppError::database(msg),
    }
}

fn validate_id(id: &str) -> AppResult<&str> {
    let key = id
        .strip_prefix("category:")
        .unwrap_or(id);
    if !is_valid_record_key(key) {
        return Err(AppError::validation("Invalid category ID"));
    }
    Ok(key)
}

/// GET /api/categories - active categories, alphabetical
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let key = validate_id(&id)?;
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(key)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(Json(category))
}

/// GET /api/categories/{id}/products - paginated products in a category
pub async fn list_products(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ProductListResponse>> {
    let key = validate_id(&id)?;

    let categories = CategoryRepository::new(state.get_db());
    categories
        .find_by_id(key)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    let mut filter = params.normalize()?;
    filter.category = Some(key.to_string());
    let query = build_query(&filter);

    let repo = ProductRepository::new(state.get_db());
    let (products, total) = repo
        .find_page(&query)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(ProductListResponse {
        products,
        pagination: Pagination::new(filter.window.page, filter.window.limit, total),
    }))
}

/// POST /api/categories - admin create
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    payload.validate()?;

    let repo = CategoryRepository::new(state.get_db());
    let created_by = Some(UserRepository::user_thing(&current.id));
    let category = repo
        .create(payload, created_by)
        .await
        .map_err(map_repo_error)?;

    tracing::info!(target: "catalog", category = %category.name, by = %current.username, "Category created");
    Ok(Json(category))
}

/// PUT /api/categories/{id} - admin update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let key = validate_id(&id)?;
    payload.validate()?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(key, payload).await.map_err(map_repo_error)?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - admin delete, refused while in use
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let key = validate_id(&id)?;

    let products = ProductRepository::new(state.get_db());
    let active = products
        .count_active_in_category(key)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let repo = CategoryRepository::new(state.get_db());
    repo.delete(key, active).await.map_err(map_repo_error)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
