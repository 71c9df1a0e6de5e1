//! Search API module

mod handler;

pub use handler::{AdvancedSearchResponse, SuggestionsResponse};

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/search", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/products", get(handler::products))
        .route("/suggestions", get(handler::suggestions))
        .route("/advanced", get(handler::advanced))
}
