//! User API module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    // Reading or editing a single account is allowed for the account
    // owner; the handlers enforce the self-or-admin rule.
    let self_routes = Router::new().route(
        "/{id}",
        get(handler::get_by_id).put(handler::update),
    );

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    self_routes.merge(admin_routes)
}
