//! Authentication module
//!
//! JWT-based authentication:
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - current user context, also an extractor
//! - [`require_auth`] / [`require_admin`] - router middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
