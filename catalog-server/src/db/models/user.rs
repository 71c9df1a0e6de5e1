//! User Model

use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::utils::AppError;
use crate::utils::validation::{
    MAX_PASSWORD_LEN, MAX_USERNAME_LEN, MIN_PASSWORD_LEN, MIN_USERNAME_LEN, validate_required_text,
};

pub type UserId = Thing;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<UserId>,
    pub username: String,
    /// Unique, stored lowercased
    pub email: String,
    /// Argon2 hash, never serialized to clients (responses use UserPublic)
    pub password_hash: String,
    /// "user" | "admin"
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Datetime,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

fn default_role() -> String {
    ROLE_USER.to_string()
}

fn default_true() -> bool {
    true
}

/// Client-facing view of a user, without credentials
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: Datetime,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        UserPublic {
            id: u
                .id
                .map(|t| t.id.to_raw())
                .unwrap_or_default(),
            username: u.username,
            email: u.email,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.username, "username", MIN_USERNAME_LEN, MAX_USERNAME_LEN)?;
        validate_email(&self.email)?;
        validate_required_text(&self.password, "password", MIN_PASSWORD_LEN, MAX_PASSWORD_LEN)?;
        Ok(())
    }
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account update payload (self or admin)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Admin only
    pub role: Option<String>,
    /// Admin only
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(ref username) = self.username {
            validate_required_text(username, "username", MIN_USERNAME_LEN, MAX_USERNAME_LEN)?;
        }
        if let Some(ref password) = self.password {
            validate_required_text(password, "password", MIN_PASSWORD_LEN, MAX_PASSWORD_LEN)?;
        }
        if let Some(ref role) = self.role
            && role != ROLE_USER
            && role != ROLE_ADMIN
        {
            return Err(AppError::validation("role must be 'user' or 'admin'"));
        }
        Ok(())
    }
}

/// Minimal structural email check. Uniqueness is enforced at the
/// repository level against the lowercased form.
fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = email.len() <= 254
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        });
    if !valid {
        return Err(AppError::validation("A valid email address is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_payload() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(register_payload().validate().is_ok());
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["", "no-at-sign", "a@b", "a@.com", "@example.com"] {
            let mut payload = register_payload();
            payload.email = bad.to_string();
            assert!(payload.validate().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn short_password_is_rejected() {
        let mut payload = register_payload();
        payload.password = "12345".to_string();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_rejects_unknown_role() {
        let update = UserUpdate {
            role: Some("root".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn public_view_strips_credentials() {
        let user = User {
            id: None,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: ROLE_USER.to_string(),
            is_active: true,
            created_at: Datetime::default(),
        };
        let json = serde_json::to_string(&UserPublic::from(user)).unwrap();
        assert!(!json.contains("password"));
    }
}
