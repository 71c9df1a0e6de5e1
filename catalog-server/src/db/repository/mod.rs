//! Repository Module
//!
//! CRUD and query operations over the SurrealDB tables.

pub mod category;
pub mod product;
pub mod user;

pub use category::CategoryRepository;
pub use product::{FeaturedPage, ProductPage, ProductRepository};
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::{Id, Thing};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention
// =============================================================================
//
// Clients may send either "table:key" or the bare key. Repositories accept
// both: strip_table_prefix normalizes to the bare key, make_thing builds the
// record pointer for query binds.

/// Strip a `table:` prefix from an id if present
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Build a record pointer from a table name and an id (with or without prefix)
pub fn make_thing(table: &str, id: &str) -> Thing {
    Thing::from((table.to_string(), Id::from(strip_table_prefix(table, id))))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_stripping_accepts_both_forms() {
        assert_eq!(strip_table_prefix("product", "product:abc"), "abc");
        assert_eq!(strip_table_prefix("product", "abc"), "abc");
        // a different table's prefix is left alone
        assert_eq!(strip_table_prefix("product", "category:abc"), "category:abc");
    }

    #[test]
    fn make_thing_normalizes() {
        let a = make_thing("product", "product:abc");
        let b = make_thing("product", "abc");
        assert_eq!(a, b);
        assert_eq!(a.tb, "product");
    }
}
