//! Catalog query builder
//!
//! Turns a normalized [`ProductFilter`] into a predicate set plus sort
//! and pagination window. Pure composition; execution lives in the
//! product repository, which binds the collected values and runs the
//! statements against storage.

use crate::catalog::filter::{ProductFilter, SortKey};

/// A value to be bound into the storage query.
///
/// Kept as plain data so the builder stays storage-agnostic and
/// unit-testable; the repository converts `Record` entries into
/// record links at bind time.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Number(f64),
    /// Record link as (table, key)
    Record(&'static str, String),
}

/// Normalized product query: predicate set + sort + window
#[derive(Debug, Clone)]
pub struct ProductQuery {
    /// Conjunction of predicate fragments (always non-empty)
    pub conditions: Vec<String>,
    /// Named values referenced by the fragments
    pub binds: Vec<(&'static str, BindValue)>,
    pub order_by: &'static str,
    pub skip: u64,
    pub limit: u32,
}

impl ProductQuery {
    /// `WHERE` clause joining all predicates with AND
    pub fn where_clause(&self) -> String {
        self.conditions.join(" AND ")
    }

    /// Full paginated SELECT statement
    pub fn select_statement(&self) -> String {
        format!(
            "SELECT * FROM product WHERE {} ORDER BY {} LIMIT {} START {}",
            self.where_clause(),
            self.order_by,
            self.limit,
            self.skip,
        )
    }

    /// Matching-population count statement (ignores the window)
    pub fn count_statement(&self) -> String {
        format!(
            "SELECT count() AS total FROM product WHERE {} GROUP ALL",
            self.where_clause(),
        )
    }
}

/// Predicate matching the free-text fields: name OR description OR
/// brand OR tag membership, all case-insensitive. Tags are joined so a
/// substring match covers membership without per-element predicates.
const TEXT_SEARCH_CONDITION: &str = "(string::lowercase(name) CONTAINS $q \
     OR string::lowercase(description) CONTAINS $q \
     OR string::lowercase(brand ?? '') CONTAINS $q \
     OR string::lowercase(array::join(tags ?? [], ' ')) CONTAINS $q)";

/// Build the normalized query for a product listing/search request.
///
/// The `is_active = true` predicate is unconditional; everything else
/// is appended only when the filter carries it. Price bounds are
/// applied independently; `min > max` legitimately matches nothing.
pub fn build_query(filter: &ProductFilter) -> ProductQuery {
    let mut conditions = vec!["is_active = true".to_string()];
    let mut binds: Vec<(&'static str, BindValue)> = Vec::new();

    if let Some(category) = &filter.category {
        conditions.push("category = $category".to_string());
        binds.push(("category", BindValue::Record("category", category.clone())));
    }

    if let Some(min) = filter.min_price {
        conditions.push("current_price >= $min_price".to_string());
        binds.push(("min_price", BindValue::Number(min)));
    }

    if let Some(max) = filter.max_price {
        conditions.push("current_price <= $max_price".to_string());
        binds.push(("max_price", BindValue::Number(max)));
    }

    if filter.in_stock {
        conditions.push("stock > 0".to_string());
    }

    if filter.featured {
        conditions.push("is_featured = true".to_string());
    }

    if let Some(brand) = &filter.brand {
        conditions.push("string::lowercase(brand ?? '') CONTAINS $brand".to_string());
        binds.push(("brand", BindValue::Text(brand.clone())));
    }

    if let Some(q) = &filter.search {
        conditions.push(TEXT_SEARCH_CONDITION.to_string());
        binds.push(("q", BindValue::Text(q.clone())));
    }

    ProductQuery {
        conditions,
        binds,
        order_by: filter.sort.order_clause(),
        skip: filter.window.skip(),
        limit: filter.window.limit,
    }
}

/// Query for the quick-search endpoint: text match only, sorted by name.
pub fn build_quick_search(q: &str, limit: u32) -> ProductQuery {
    ProductQuery {
        conditions: vec![
            "is_active = true".to_string(),
            TEXT_SEARCH_CONDITION.to_string(),
        ],
        binds: vec![("q", BindValue::Text(q.to_lowercase()))],
        order_by: SortKey::Name.order_clause(),
        skip: 0,
        limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filter::{PageWindow, ProductFilter, SortKey};

    fn empty_filter() -> ProductFilter {
        ProductFilter {
            search: None,
            category: None,
            min_price: None,
            max_price: None,
            brand: None,
            in_stock: false,
            featured: false,
            sort: SortKey::Newest,
            window: PageWindow { page: 1, limit: 12 },
        }
    }

    #[test]
    fn is_active_predicate_is_always_present() {
        let bare = build_query(&empty_filter());
        assert!(bare.conditions.contains(&"is_active = true".to_string()));

        let full = build_query(&ProductFilter {
            search: Some("laptop".into()),
            category: Some("abc".into()),
            min_price: Some(10.0),
            max_price: Some(500.0),
            brand: Some("acme".into()),
            in_stock: true,
            featured: true,
            sort: SortKey::Rating,
            window: PageWindow { page: 3, limit: 20 },
        });
        assert!(full.conditions.contains(&"is_active = true".to_string()));
        assert_eq!(full.conditions.len(), 8);
        assert_eq!(full.skip, 40);
        assert_eq!(full.limit, 20);
    }

    #[test]
    fn inverted_price_range_is_not_special_cased() {
        let query = build_query(&ProductFilter {
            min_price: Some(20.0),
            max_price: Some(10.0),
            ..empty_filter()
        });
        // Both bounds present and ANDed; the set simply matches nothing.
        assert!(query.conditions.iter().any(|c| c.contains(">= $min_price")));
        assert!(query.conditions.iter().any(|c| c.contains("<= $max_price")));
        assert_eq!(
            query.binds,
            vec![
                ("min_price", BindValue::Number(20.0)),
                ("max_price", BindValue::Number(10.0)),
            ]
        );
    }

    #[test]
    fn stock_and_featured_flags_add_predicates_only_when_set() {
        let off = build_query(&empty_filter());
        assert_eq!(off.conditions.len(), 1);

        let on = build_query(&ProductFilter {
            in_stock: true,
            featured: true,
            ..empty_filter()
        });
        assert!(on.conditions.contains(&"stock > 0".to_string()));
        assert!(on.conditions.contains(&"is_featured = true".to_string()));
    }

    #[test]
    fn text_search_is_anded_with_other_filters() {
        let query = build_query(&ProductFilter {
            search: Some("mouse".into()),
            in_stock: true,
            ..empty_filter()
        });
        let clause = query.where_clause();
        // OR only appears inside the text group; groups join with AND
        assert!(clause.contains("stock > 0 AND (string::lowercase(name)"));
        assert!(clause.contains("OR string::lowercase(description)"));
    }

    #[test]
    fn select_statement_shape() {
        let query = build_query(&ProductFilter {
            sort: SortKey::PriceLow,
            window: PageWindow { page: 2, limit: 10 },
            ..empty_filter()
        });
        assert_eq!(
            query.select_statement(),
            "SELECT * FROM product WHERE is_active = true \
             ORDER BY current_price ASC LIMIT 10 START 10"
        );
        assert_eq!(
            query.count_statement(),
            "SELECT count() AS total FROM product WHERE is_active = true GROUP ALL"
        );
    }

    #[test]
    fn quick_search_sorts_by_name() {
        let query = build_quick_search("USB Hub", 5);
        assert_eq!(query.order_by, "name ASC");
        assert_eq!(query.limit, 5);
        assert_eq!(query.binds, vec![("q", BindValue::Text("usb hub".into()))]);
        assert!(query.conditions.contains(&"is_active = true".to_string()));
    }

    #[test]
    fn category_binds_as_record_link() {
        let query = build_query(&ProductFilter {
            category: Some("xyz9".into()),
            ..empty_filter()
        });
        assert_eq!(
            query.binds,
            vec![("category", BindValue::Record("category", "xyz9".into()))]
        );
    }
}
