//! Upload Routes
//!
//! Product image upload (admin) and public serving of stored images.

mod handler;

use axum::{
    Router, middleware,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use http::header;

use crate::auth::require_admin;
use crate::core::ServerState;

enum UploadFileResponse {
    Ok(Bytes),
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for UploadFileResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            UploadFileResponse::Ok(content) => (
                http::StatusCode::OK,
                [(header::CONTENT_TYPE, "image/jpeg")],
                content,
            )
                .into_response(),
            UploadFileResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
            UploadFileResponse::BadRequest(msg) => {
                (http::StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}

/// Serve a stored product image
async fn serve_uploaded_file(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> UploadFileResponse {
    // Path traversal guard
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return UploadFileResponse::BadRequest("Invalid filename");
    }

    let file_path = state.config.upload_dir().join(&filename);
    match tokio::fs::read(&file_path).await {
        Ok(content) => UploadFileResponse::Ok(content.into()),
        Err(_) => UploadFileResponse::NotFound,
    }
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/upload",
            post(handler::upload).layer(middleware::from_fn(require_admin)),
        )
        // Stored images are public (not under /api, no auth)
        .route("/uploads/{filename}", get(serve_uploaded_file))
}
