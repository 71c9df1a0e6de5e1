//! Authentication middleware
//!
//! JWT authentication and authorization layers for the Axum router.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Whether a request may pass without a token.
///
/// The storefront surface is read-only and public: browsing, search
/// and category listings. Everything that mutates the catalog or
/// touches accounts requires a token.
fn is_public_route(method: &Method, path: &str) -> bool {
    // CORS preflight
    if method == Method::OPTIONS {
        return true;
    }

    // Non-API paths (health, static uploads) answer for themselves
    if !path.starts_with("/api/") {
        return true;
    }

    if method == Method::POST {
        return path == "/api/auth/register" || path == "/api/auth/login";
    }

    if method == Method::GET || method == Method::HEAD {
        return path.starts_with("/api/products")
            || path.starts_with("/api/search")
            || path.starts_with("/api/categories");
    }

    false
}

/// Authentication middleware, applied to the whole router.
///
/// Public routes pass straight through. For everything else the
/// `Authorization: Bearer <token>` header is validated and the
/// resolved [`CurrentUser`] is injected into the request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_route(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => {
            JwtService::extract_from_header(header).ok_or_else(AppError::invalid_token)?
        }
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::unauthorized());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token()),
            }
        }
    }
}

/// Admin gate for management routes. Must sit inside [`require_auth`]
/// so the current user is already resolved.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user = %user.username,
            uri = %req.uri(),
            "Admin route denied"
        );
        return Err(AppError::forbidden("Admin access required"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storefront_reads_are_public() {
        assert!(is_public_route(&Method::GET, "/api/products"));
        assert!(is_public_route(&Method::GET, "/api/products/abc"));
        assert!(is_public_route(&Method::GET, "/api/search/advanced"));
        assert!(is_public_route(&Method::GET, "/api/categories"));
        assert!(is_public_route(&Method::GET, "/health"));
        assert!(is_public_route(&Method::POST, "/api/auth/login"));
        assert!(is_public_route(&Method::POST, "/api/auth/register"));
    }

    #[test]
    fn mutations_and_accounts_are_protected() {
        assert!(!is_public_route(&Method::POST, "/api/products"));
        assert!(!is_public_route(&Method::PUT, "/api/products/abc"));
        assert!(!is_public_route(&Method::DELETE, "/api/categories/abc"));
        assert!(!is_public_route(&Method::GET, "/api/users"));
        assert!(!is_public_route(&Method::GET, "/api/auth/me"));
        assert!(!is_public_route(&Method::POST, "/api/upload"));
    }
}
