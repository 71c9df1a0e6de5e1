//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health checks
//! - [`auth`] - registration, login, current user
//! - [`products`] - catalog listing and product management
//! - [`search`] - quick search, suggestions, advanced search
//! - [`categories`] - category browsing and management
//! - [`users`] - account management
//! - [`upload`] - product image upload

pub mod auth;
pub mod categories;
pub mod health;
pub mod products;
pub mod search;
pub mod upload;
pub mod users;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(upload::router())
        .merge(products::router())
        .merge(search::router())
        .merge(categories::router())
        .merge(users::router())
}

/// HTTP request log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// The complete application: routes, auth layer and HTTP middleware
pub fn router(state: ServerState) -> Router {
    build_app()
        // Token validation for everything that is not a public route
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}
