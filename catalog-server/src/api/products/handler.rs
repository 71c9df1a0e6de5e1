//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::catalog::{ListParams, Pagination, build_query};
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductRepository, RepoError, UserRepository};
use crate::pricing::compute_display_price;
use crate::session::{session_cookie_value, session_id_from_cookies};
use crate::utils::{AppError, AppResult};

/// One page of catalog results
#[derive(Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// A product detail view with its session-priced extras
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: Product,
    /// Price after the session multiplier, rounded to cents
    pub dynamic_price: f64,
    /// Views of this product within the caller's session
    pub user_visits: u32,
    /// Whether the dynamic price differs from the base price
    pub price_adjustment: bool,
}

fn map_repo_error(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Duplicate(msg) => AppError::conflict(msg),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Database(msg) => AppError::database(msg),
    }
}

/// GET /api/products - filtered, paginated catalog listing
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ProductListResponse>> {
    let filter = params.normalize()?;
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

/// GET /api/products/featured/list
pub async fn featured(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo
        .find_featured()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(products))
}

/// GET /api/products/{id} - detail view with dynamic pricing
///
/// Each view counts against the caller's session ledger and the
/// product's global counter; the displayed price is derived from the
/// ledger count including this view.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    // Resolve or establish the browsing session
    let existing_sid = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session_id_from_cookies);
    let is_new_session = existing_sid.is_none();
    let session_id =
        existing_sid.unwrap_or_else(crate::session::SessionStore::new_session_id);

    let product_key = product
        .id
        .as_ref()
        .map(|t| t.id.to_raw())
        .unwrap_or_else(|| id.clone());

    let user_visits = state.sessions.record_visit(&session_id, &product_key);
    let dynamic_price = compute_display_price(product.base_price, user_visits);

    // Global counter; the record itself is not re-read into the response
    let visit_count = repo
        .increment_visit(&product_key)
        .await
        .map_err(map_repo_error)?;

    let mut product = product;
    product.visit_count = visit_count;

    let price_adjustment = dynamic_price != product.base_price;
    let body = Json(ProductDetailResponse {
        product,
        dynamic_price,
        user_visits,
        price_adjustment,
    });

    let mut response = body.into_response();
    if is_new_session {
        let cookie = session_cookie_value(&session_id, state.config.session_ttl_minutes as i64);
        if let Ok(value) = cookie.parse() {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    Ok(response)
}

/// POST /api/products - admin create
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    payload.validate()?;

    let repo = ProductRepository::new(state.get_db());
    let created_by = Some(UserRepository::user_thing(&current.id));
    let product = repo
        .create(payload, created_by)
        .await
        .map_err(map_repo_error)?;

    tracing::info!(target: "catalog", product = %product.name, by = %current.username, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/{id} - admin update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    payload.validate()?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&id, payload).await.map_err(map_repo_error)?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - admin delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.get_db());
    repo.delete(&id).await.map_err(map_repo_error)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
