//! Product Repository

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::catalog::{BindValue, PriceRange, ProductQuery};
use crate::db::models::{Product, ProductCreate, ProductUpdate};

const PRODUCT_TABLE: &str = "product";
const CATEGORY_TABLE: &str = "category";

/// Number of products on the featured shelf
pub const FEATURED_LIMIT: u32 = 8;

/// One page of products plus the matching-population total
pub type ProductPage = (Vec<Product>, u64);

/// Featured products are a fixed-size page without a count
pub type FeaturedPage = Vec<Product>;

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct RangeRow {
    min_price: f64,
    max_price: f64,
}

#[derive(Debug, Deserialize)]
struct BrandRow {
    brand: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VisitRow {
    visit_count: i64,
}

// =============================================================================
// Product Repository
// =============================================================================

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Run a normalized catalog query: one page of rows plus the total.
    pub async fn find_page(&self, query: &ProductQuery) -> RepoResult<ProductPage> {
        let mut select = self.base.db().query(query.select_statement());
        for (name, value) in &query.binds {
            select = bind_value(select, name, value);
        }
        let products: Vec<Product> = select.await?.take(0)?;

        let mut count = self.base.db().query(query.count_statement());
        for (name, value) in &query.binds {
            count = bind_value(count, name, value);
        }
        let rows: Vec<CountRow> = count.await?.take(0)?;
        let total = rows.first().map(|r| r.total).unwrap_or(0);

        Ok((products, total))
    }

    /// Find product by id (active or not; visibility is decided by the caller)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    /// The featured shelf: active featured products, newest first
    pub async fn find_featured(&self) -> RepoResult<FeaturedPage> {
        let products: Vec<Product> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM product \
                 WHERE is_active = true AND is_featured = true \
                 ORDER BY created_at DESC LIMIT {FEATURED_LIMIT}"
            ))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Typeahead lookup: active product names matching `q`, (key, name) pairs
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
                "SELECT id, name FROM product \
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

    /// Typeahead lookup: distinct brands matching `q`
    pub async fn suggest_brands(&self, q: &str, limit: u32) -> RepoResult<Vec<String>> {
        let rows: Vec<BrandRow> = self
            .base
            .db()
            .query(format!(
                "SELECT brand FROM product \
                 WHERE is_active = true AND brand != NONE AND brand != '' \
                 AND string::lowercase(brand) CONTAINS $q \
                 GROUP BY brand LIMIT {limit}"
            ))
            .bind(("q", q.to_lowercase()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().filter_map(|r| r.brand).collect())
    }

    /// Create a new product and bump the category's denormalized counter
    pub async fn create(&self, data: ProductCreate, created_by: Option<Thing>) -> RepoResult<Product> {
        let category = make_thing(CATEGORY_TABLE, &data.category);
        self.ensure_category_exists(&category).await?;

        let base_price = data.base_price;
        let product = Product {
            id: None,
            name: data.name.trim().to_string(),
            description: data.description.trim().to_string(),
            base_price,
            current_price: base_price,
            stock: data.stock,
            category: category.clone(),
            image: data.image.unwrap_or_default(),
            image_type: "url".to_string(),
            brand: data.brand,
            rating: 0.0,
            review_count: 0,
            is_active: true,
            is_featured: data.is_featured.unwrap_or(false),
            tags: data.tags.unwrap_or_default(),
            visit_count: 0,
            created_by,
            created_at: Default::default(),
            updated_at: Default::default(),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))?;

        self.adjust_category_count(&category, 1).await?;

        Ok(created)
    }

    /// Update a product
    ///
    /// A price edit writes both base_price and current_price so the
    /// canonical catalog price stays in sync with the admin-set one.
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = make_thing(PRODUCT_TABLE, id);

        let category = match &data.category {
            Some(raw) => {
                let cat = make_thing(CATEGORY_TABLE, raw);
                self.ensure_category_exists(&cat).await?;
                Some(cat)
            }
            None => None,
        };

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() { set_parts.push("name = $name"); }
        if data.description.is_some() { set_parts.push("description = $description"); }
        if data.base_price.is_some() {
            set_parts.push("base_price = $base_price");
            set_parts.push("current_price = $base_price");
        }
        if data.stock.is_some() { set_parts.push("stock = $stock"); }
        if category.is_some() { set_parts.push("category = $category"); }
        if data.image.is_some() { set_parts.push("image = $image"); }
        if data.brand.is_some() { set_parts.push("brand = $brand"); }
        if data.tags.is_some() { set_parts.push("tags = $tags"); }
        if data.is_featured.is_some() { set_parts.push("is_featured = $is_featured"); }
        if data.is_active.is_some() { set_parts.push("is_active = $is_active"); }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }
        set_parts.push("updated_at = time::now()");

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = data.name { query = query.bind(("name", v.trim().to_string())); }
        if let Some(v) = data.description { query = query.bind(("description", v.trim().to_string())); }
        if let Some(v) = data.base_price { query = query.bind(("base_price", v)); }
        if let Some(v) = data.stock { query = query.bind(("stock", v)); }
        if let Some(v) = category { query = query.bind(("category", v)); }
        if let Some(v) = data.image { query = query.bind(("image", v)); }
        if let Some(v) = data.brand { query = query.bind(("brand", v)); }
        if let Some(v) = data.tags { query = query.bind(("tags", v)); }
        if let Some(v) = data.is_featured { query = query.bind(("is_featured", v)); }
        if let Some(v) = data.is_active { query = query.bind(("is_active", v)); }

        let products: Vec<Product> = query.await?.take(0)?;

        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product and release its category counter slot
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let existing: Option<Product> =
            self.base.db().delete((PRODUCT_TABLE, pure_id)).await?;

        let existing =
            existing.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        self.adjust_category_count(&existing.category, -1).await?;
        Ok(())
    }

    /// Atomically bump the global view counter, returning the new value.
    ///
    /// The increment happens inside the storage engine so concurrent
    /// detail views never lose updates.
    pub async fn increment_visit(&self, id: &str) -> RepoResult<i64> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let rows: Vec<VisitRow> = self
            .base
            .db()
            .query("UPDATE $thing SET visit_count += 1 RETURN AFTER")
            .bind(("thing", thing))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .map(|r| r.visit_count)
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Min/max of current_price across all active products
    pub async fn price_range(&self) -> RepoResult<PriceRange> {
        let rows: Vec<RangeRow> = self
            .base
            .db()
            .query(
                "SELECT math::min(current_price) AS min_price, \
                        math::max(current_price) AS max_price \
                 FROM product WHERE is_active = true GROUP ALL",
            )
            .await?
            .take(0)?;
        Ok(rows
            .first()
            .map(|r| PriceRange {
                min_price: r.min_price,
                max_price: r.max_price,
            })
            .unwrap_or_default())
    }

    /// Distinct brands across active products (raw; caller normalizes)
    pub async fn distinct_brands(&self) -> RepoResult<Vec<String>> {
        let rows: Vec<BrandRow> = self
            .base
            .db()
            .query("SELECT brand FROM product WHERE is_active = true GROUP BY brand")
            .await?
            .take(0)?;
        Ok(rows.into_iter().filter_map(|r| r.brand).collect())
    }

    /// Count of active products in a category
    pub async fn count_active_in_category(&self, category_id: &str) -> RepoResult<u64> {
        let cat = make_thing(CATEGORY_TABLE, category_id);
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM product \
                 WHERE category = $cat AND is_active = true GROUP ALL",
            )
            .bind(("cat", cat))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn ensure_category_exists(&self, category: &Thing) -> RepoResult<()> {
        #[derive(Debug, Deserialize)]
        struct IdRow {
            #[allow(dead_code)]
            id: Thing,
        }
        let rows: Vec<IdRow> = self
            .base
            .db()
            .query("SELECT id FROM $cat WHERE is_active = true")
            .bind(("cat", category.clone()))
            .await?
            .take(0)?;
        if rows.is_empty() {
            return Err(RepoError::NotFound(format!(
                "Category {} not found",
                category.id.to_raw()
            )));
        }
        Ok(())
    }

    async fn adjust_category_count(&self, category: &Thing, delta: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $cat SET product_count += $delta")
            .bind(("cat", category.clone()))
            .bind(("delta", delta))
            .await?;
        Ok(())
    }
}

/// Attach one builder bind to a prepared statement with its native type
fn bind_value<'a, C: surrealdb::Connection>(
    query: surrealdb::method::Query<'a, C>,
    name: &'static str,
    value: &BindValue,
) -> surrealdb::method::Query<'a, C> {
    match value {
        BindValue::Text(s) => query.bind((name, s.clone())),
        BindValue::Number(n) => query.bind((name, *n)),
        BindValue::Record(table, key) => query.bind((name, make_thing(table, key))),
    }
}
