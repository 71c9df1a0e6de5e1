//! Category Repository

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate, slugify};

const CATEGORY_TABLE: &str = "category";

#[derive(Debug, Deserialize)]
struct IdRow {
    id: Thing,
}

// =============================================================================
// Category Repository
// =============================================================================

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All active categories, alphabetical
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE is_active = true ORDER BY name ASC")
            .await?
            .take(0)?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let pure_id = strip_table_prefix(CATEGORY_TABLE, id);
        let category: Option<Category> = self.base.db().select((CATEGORY_TABLE, pure_id)).await?;
        Ok(category)
    }

    /// Create a category; names are unique case-insensitively
    pub async fn create(&self, data: CategoryCreate, created_by: Option<Thing>) -> RepoResult<Category> {
        let name = data.name.trim().to_string();
        if self.name_taken(&name, None).await? {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let category = Category {
            id: None,
            slug: slugify(&name),
            name,
            description: data.description.unwrap_or_default(),
            product_count: 0,
            is_active: true,
            created_by,
            created_at: Default::default(),
        };

        let created: Option<Category> = self
            .base
            .db()
            .create(CATEGORY_TABLE)
            .content(category)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category; a rename re-checks uniqueness and re-slugs
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let thing = make_thing(CATEGORY_TABLE, id);

        let name = data.name.map(|n| n.trim().to_string());
        if let Some(ref name) = name
            && self.name_taken(name, Some(&thing)).await?
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if name.is_some() {
            set_parts.push("name = $name");
            set_parts.push("slug = $slug");
        }
        if data.description.is_some() { set_parts.push("description = $description"); }
        if data.is_active.is_some() { set_parts.push("is_active = $is_active"); }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(name) = name {
            query = query.bind(("slug", slugify(&name)));
            query = query.bind(("name", name));
        }
        if let Some(v) = data.description { query = query.bind(("description", v)); }
        if let Some(v) = data.is_active { query = query.bind(("is_active", v)); }

        let categories: Vec<Category> = query.await?.take(0)?;
        categories
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category. Refused while active products still reference it.
    pub async fn delete(&self, id: &str, active_products: u64) -> RepoResult<()> {
        if active_products > 0 {
            return Err(RepoError::Validation(format!(
                "Cannot delete category with {} active products",
                active_products
            )));
        }
        let pure_id = strip_table_prefix(CATEGORY_TABLE, id);
        let existing: Option<Category> =
            self.base.db().delete((CATEGORY_TABLE, pure_id)).await?;
        existing
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Typeahead lookup: active category names matching `q`, (key, name) pairs
    pub async fn suggest_names(&self, q: &str, limit: u32) -> RepoResult<Vec<(String, String)>> {
        #[derive(Debug, Deserialize)]
        struct NameRow {
            id: Thing,
            name: String,
        }
        let rows: Vec<NameRow> = self
            .base
            .db()
            .query(format!(
                "SELECT id, name FROM category \
                 WHERE is_active = true AND string::lowercase(name) CONTAINS $q \
                 ORDER BY name ASC LIMIT {limit}"
            ))
            .bind(("q", q.to_lowercase()))
            .await?
            .take(0)?;
        Ok(rows
            .into_iter()
            .map(|r| (r.id.id.to_raw(), r.name))
            .collect())
    }

    /// Case-insensitive name collision check, optionally excluding one record
    async fn name_taken(&self, name: &str, exclude: Option<&Thing>) -> RepoResult<bool> {
        let rows: Vec<IdRow> = self
            .base
            .db()
            .query("SELECT id FROM category WHERE string::lowercase(name) = $name")
            .bind(("name", name.to_lowercase()))
            .await?
            .take(0)?;
        Ok(rows.iter().any(|row| Some(&row.id) != exclude))
    }
}
