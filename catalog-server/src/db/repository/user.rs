//! User Repository

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::{RegisterRequest, User, UserUpdate, user::ROLE_USER};

const USER_TABLE: &str = "user";

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

// =============================================================================
// User Repository
// =============================================================================

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Register a new account. Emails are unique against the lowercased form.
    pub async fn create(&self, data: RegisterRequest) -> RepoResult<User> {
        let email = data.email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let user = User {
            id: None,
            username: data.username.trim().to_string(),
            email,
            password_hash,
            role: ROLE_USER.to_string(),
            is_active: true,
            created_at: Default::default(),
        };

        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let pure_id = strip_table_prefix(USER_TABLE, id);
        let user: Option<User> = self.base.db().select((USER_TABLE, pure_id)).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.trim().to_lowercase()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// One page of accounts plus the total, newest first
    pub async fn find_page(&self, skip: u32, limit: u32) -> RepoResult<(Vec<User>, u64)> {
        let users: Vec<User> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM user ORDER BY created_at DESC LIMIT {limit} START {skip}"
            ))
            .await?
            .take(0)?;

        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await?
            .take(0)?;
        let total = rows.first().map(|r| r.total).unwrap_or(0);

        Ok((users, total))
    }

    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let thing = make_thing(USER_TABLE, id);

        let password_hash = match &data.password {
            Some(password) => Some(
                User::hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            ),
            None => None,
        };

        let mut set_parts: Vec<&str> = Vec::new();
        if data.username.is_some() { set_parts.push("username = $username"); }
        if password_hash.is_some() { set_parts.push("password_hash = $password_hash"); }
        if data.role.is_some() { set_parts.push("role = $role"); }
        if data.is_active.is_some() { set_parts.push("is_active = $is_active"); }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = data.username { query = query.bind(("username", v.trim().to_string())); }
        if let Some(v) = password_hash { query = query.bind(("password_hash", v)); }
        if let Some(v) = data.role { query = query.bind(("role", v)); }
        if let Some(v) = data.is_active { query = query.bind(("is_active", v)); }

        let users: Vec<User> = query.await?.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(USER_TABLE, id);
        let existing: Option<User> = self.base.db().delete((USER_TABLE, pure_id)).await?;
        existing
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Thing pointer for a user id, for created_by links
    pub fn user_thing(id: &str) -> Thing {
        make_thing(USER_TABLE, id)
    }
}
