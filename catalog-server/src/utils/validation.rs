//! Input validation helpers
//!
//! Centralized text length constants and validation functions for the
//! catalog CRUD handlers and the query-parameter normalizers.

use crate::utils::AppError;

// ========== Text length limits ==========

/// Product names
pub const MIN_PRODUCT_NAME_LEN: u64 = 2;
pub const MAX_PRODUCT_NAME_LEN: u64 = 100;

/// Product descriptions
pub const MIN_DESCRIPTION_LEN: u64 = 10;
pub const MAX_DESCRIPTION_LEN: u64 = 1000;

/// Category names
pub const MIN_CATEGORY_NAME_LEN: u64 = 2;
pub const MAX_CATEGORY_NAME_LEN: u64 = 30;

/// Category descriptions
pub const MAX_CATEGORY_DESC_LEN: u64 = 200;

/// Brand names
pub const MAX_BRAND_LEN: u64 = 50;

/// Usernames
pub const MIN_USERNAME_LEN: u64 = 3;
pub const MAX_USERNAME_LEN: u64 = 30;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: u64 = 6;
pub const MAX_PASSWORD_LEN: u64 = 128;

/// URLs / image paths
pub const MAX_URL_LEN: u64 = 2048;

// ========== Validation helpers (CRUD handlers) ==========

/// Validate that a required string is non-empty (after trimming) and
/// within the length bounds.
pub fn validate_required_text(
    value: &str,
    field: &str,
    min_len: u64,
    max_len: u64,
) -> Result<(), AppError> {
    let len = value.trim().len() as u64;
    if len < min_len || len > max_len {
        return Err(AppError::validation(format!(
            "{field} must be between {min_len}-{max_len} characters"
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: u64,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() as u64 > max_len
    {
        return Err(AppError::validation(format!(
            "{field} cannot exceed {max_len} characters"
        )));
    }
    Ok(())
}

/// Validate a monetary amount from a request body (finite, non-negative).
pub fn validate_price_value(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

// ========== Query parameter helpers ==========

/// Parse an optional integer query parameter within `[min, max]`.
///
/// Returns `default` when the parameter is absent; rejects non-numeric
/// or out-of-range values with a validation error naming the field.
pub fn parse_bounded_int(
    raw: Option<&str>,
    field: &str,
    min: u32,
    max: u32,
    default: u32,
) -> Result<u32, AppError> {
    match raw {
        None => Ok(default),
        Some(s) => {
            let value: u32 = s.trim().parse().map_err(|_| {
                AppError::validation(format!("{field} must be an integer between {min} and {max}"))
            })?;
            if value < min || value > max {
                return Err(AppError::validation(format!(
                    "{field} must be between {min} and {max}"
                )));
            }
            Ok(value)
        }
    }
}

/// Parse an optional non-negative price parameter.
pub fn parse_price(raw: Option<&str>, field: &str) -> Result<Option<f64>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) => {
            let value: f64 = s.trim().parse().map_err(|_| {
                AppError::validation(format!("{field} must be a non-negative number"))
            })?;
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::validation(format!(
                    "{field} must be a non-negative number"
                )));
            }
            Ok(Some(value))
        }
    }
}

/// Parse an optional boolean flag ("true" / "false").
pub fn parse_bool_flag(raw: Option<&str>, field: &str) -> Result<bool, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(_) => Err(AppError::validation(format!("{field} must be a boolean"))),
    }
}

/// Check whether a string is a syntactically valid record key.
///
/// Record keys are the part after `table:` in a record id. Anything
/// else must be rejected before it reaches the query builder.
pub fn is_valid_record_key(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a record-id query parameter, stripping a `table:` prefix if present.
pub fn parse_record_key(
    raw: Option<&str>,
    table: &str,
    field: &str,
) -> Result<Option<String>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            let key = s
                .strip_prefix(table)
                .and_then(|rest| rest.strip_prefix(':'))
                .unwrap_or(s);
            if !is_valid_record_key(key) {
                return Err(AppError::validation(format!("Invalid {field} ID")));
            }
            Ok(Some(key.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_int_defaults_when_absent() {
        assert_eq!(parse_bounded_int(None, "page", 1, 100, 12).unwrap(), 12);
    }

    #[test]
    fn bounded_int_rejects_non_numeric() {
        let err = parse_bounded_int(Some("abc"), "page", 1, 100, 1).unwrap_err();
        assert!(err.to_string().contains("page"));
    }

    #[test]
    fn bounded_int_rejects_out_of_range() {
        assert!(parse_bounded_int(Some("0"), "page", 1, 100, 1).is_err());
        assert!(parse_bounded_int(Some("101"), "limit", 1, 100, 12).is_err());
    }

    #[test]
    fn price_rejects_negative_and_garbage() {
        assert!(parse_price(Some("-1"), "minPrice").is_err());
        assert!(parse_price(Some("cheap"), "minPrice").is_err());
        assert_eq!(parse_price(Some("19.99"), "minPrice").unwrap(), Some(19.99));
        assert_eq!(parse_price(None, "minPrice").unwrap(), None);
    }

    #[test]
    fn bool_flag_is_strict() {
        assert!(parse_bool_flag(Some("true"), "inStock").unwrap());
        assert!(!parse_bool_flag(Some("false"), "inStock").unwrap());
        assert!(!parse_bool_flag(None, "inStock").unwrap());
        assert!(parse_bool_flag(Some("yes"), "inStock").is_err());
    }

    #[test]
    fn record_key_validation() {
        assert!(is_valid_record_key("abc123"));
        assert!(is_valid_record_key("u_1"));
        assert!(!is_valid_record_key(""));
        assert!(!is_valid_record_key("a; DROP TABLE product"));

        // table prefix is stripped transparently
        let key = parse_record_key(Some("category:xyz"), "category", "category").unwrap();
        assert_eq!(key.as_deref(), Some("xyz"));
        assert!(parse_record_key(Some("bad id!"), "category", "category").is_err());
    }
}
