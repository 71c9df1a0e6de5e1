//! Utility module - common helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error type
//! - [`AppResponse`] - response envelope
//! - logger and validation helpers

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult};
