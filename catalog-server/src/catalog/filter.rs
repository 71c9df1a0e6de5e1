//! Filter parameter normalization
//!
//! Raw query-string parameters are validated and normalized exactly
//! once per request into a [`ProductFilter`]; the query builder then
//! assumes well-typed inputs and composes predicates only.

use serde::Deserialize;

use crate::utils::AppError;
use crate::utils::validation::{parse_bool_flag, parse_bounded_int, parse_price, parse_record_key};

/// Default page size for catalog listings
pub const LIST_DEFAULT_LIMIT: u32 = 12;
/// Maximum page size for catalog listings
pub const LIST_MAX_LIMIT: u32 = 100;
/// Maximum page size for search endpoints
pub const SEARCH_MAX_LIMIT: u32 = 50;
/// Default result count for quick search
pub const SEARCH_DEFAULT_LIMIT: u32 = 10;
/// Default result count for suggestions
pub const SUGGESTION_DEFAULT_LIMIT: u32 = 8;
/// Maximum result count for suggestions
pub const SUGGESTION_MAX_LIMIT: u32 = 20;

/// Sort key for product listings.
///
/// Unrecognized values silently fall back to [`SortKey::Newest`];
/// this is the one permissive default in the filter pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceLow,
    PriceHigh,
    Name,
    Rating,
    Newest,
}

impl SortKey {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("price-low") => Self::PriceLow,
            Some("price-high") => Self::PriceHigh,
            Some("name") => Self::Name,
            Some("rating") => Self::Rating,
            _ => Self::Newest,
        }
    }

    /// ORDER BY clause fragment for this key
    pub fn order_clause(&self) -> &'static str {
        match self {
            Self::PriceLow => "current_price ASC",
            Self::PriceHigh => "current_price DESC",
            Self::Name => "name ASC",
            Self::Rating => "rating DESC",
            Self::Newest => "created_at DESC",
        }
    }
}

/// Pagination window, already validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl PageWindow {
    /// Offset of the first row; widened so `page` near `u32::MAX`
    /// cannot overflow the multiplication.
    pub fn skip(&self) -> u64 {
        (u64::from(self.page) - 1) * u64::from(self.limit)
    }
}

/// Normalized product filter, the single input to the query builder
#[derive(Debug, Clone)]
pub struct ProductFilter {
    /// Free-text search, lowercased
    pub search: Option<String>,
    /// Category record key (already syntax-validated)
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Brand substring, lowercased
    pub brand: Option<String>,
    pub in_stock: bool,
    pub featured: bool,
    pub sort: SortKey,
    pub window: PageWindow,
}

/// Raw query parameters for `GET /api/products`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    #[serde(rename = "inStock")]
    pub in_stock: Option<String>,
    pub featured: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    /// Validate and normalize listing parameters (limit 1-100, default 12).
    pub fn normalize(&self) -> Result<ProductFilter, AppError> {
        self.normalize_with_limits(LIST_MAX_LIMIT, LIST_DEFAULT_LIMIT)
    }

    fn normalize_with_limits(&self, max_limit: u32, default_limit: u32) -> Result<ProductFilter, AppError> {
        let page = parse_bounded_int(self.page.as_deref(), "page", 1, u32::MAX, 1)?;
        let limit = parse_bounded_int(self.limit.as_deref(), "limit", 1, max_limit, default_limit)?;

        Ok(ProductFilter {
            search: normalize_text(self.search.as_deref()),
            category: parse_record_key(self.category.as_deref(), "category", "category")?,
            min_price: parse_price(self.min_price.as_deref(), "minPrice")?,
            max_price: parse_price(self.max_price.as_deref(), "maxPrice")?,
            brand: None,
            in_stock: parse_bool_flag(self.in_stock.as_deref(), "inStock")?,
            featured: parse_bool_flag(self.featured.as_deref(), "featured")?,
            sort: SortKey::parse(self.sort.as_deref()),
            window: PageWindow { page, limit },
        })
    }
}

/// Raw query parameters for `GET /api/search/advanced`
#[derive(Debug, Default, Deserialize)]
pub struct AdvancedSearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    pub brand: Option<String>,
    #[serde(rename = "inStock")]
    pub in_stock: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

impl AdvancedSearchParams {
    /// Validate and normalize advanced search parameters (limit 1-50, default 12).
    pub fn normalize(&self) -> Result<ProductFilter, AppError> {
        let page = parse_bounded_int(self.page.as_deref(), "page", 1, u32::MAX, 1)?;
        let limit =
            parse_bounded_int(self.limit.as_deref(), "limit", 1, SEARCH_MAX_LIMIT, LIST_DEFAULT_LIMIT)?;

        Ok(ProductFilter {
            search: normalize_text(self.q.as_deref()),
            category: parse_record_key(self.category.as_deref(), "category", "category")?,
            min_price: parse_price(self.min_price.as_deref(), "minPrice")?,
            max_price: parse_price(self.max_price.as_deref(), "maxPrice")?,
            brand: normalize_text(self.brand.as_deref()),
            in_stock: parse_bool_flag(self.in_stock.as_deref(), "inStock")?,
            featured: false,
            sort: SortKey::parse(self.sort.as_deref()),
            window: PageWindow { page, limit },
        })
    }
}

/// Raw query parameters for `GET /api/search/products` and `/suggestions`
#[derive(Debug, Default, Deserialize)]
pub struct QuickSearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

impl QuickSearchParams {
    /// Validate quick-search parameters; `q` is required here.
    pub fn normalize(&self, max_limit: u32, default_limit: u32) -> Result<(String, u32), AppError> {
        let q = normalize_text(self.q.as_deref())
            .ok_or_else(|| AppError::validation("q: search query is required"))?;
        let limit = parse_bounded_int(self.limit.as_deref(), "limit", 1, max_limit, default_limit)?;
        Ok((q, limit))
    }
}

fn normalize_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_params() {
        let filter = ListParams::default().normalize().unwrap();
        assert_eq!(filter.window.page, 1);
        assert_eq!(filter.window.limit, LIST_DEFAULT_LIMIT);
        assert_eq!(filter.sort, SortKey::Newest);
        assert!(filter.search.is_none());
        assert!(!filter.in_stock);
    }

    #[test]
    fn skip_arithmetic() {
        for (page, limit, skip) in [(1, 12, 0), (2, 12, 12), (5, 20, 80), (1, 1, 0)] {
            let w = PageWindow { page, limit };
            assert_eq!(w.skip(), skip);
        }
    }

    #[test]
    fn skip_does_not_overflow_at_max_page() {
        let w = PageWindow {
            page: u32::MAX,
            limit: LIST_MAX_LIMIT,
        };
        assert_eq!(w.skip(), (u64::from(u32::MAX) - 1) * u64::from(LIST_MAX_LIMIT));

        let params = ListParams {
            page: Some(u32::MAX.to_string()),
            ..Default::default()
        };
        let filter = params.normalize().unwrap();
        assert_eq!(filter.window.skip(), (u64::from(u32::MAX) - 1) * 12);
    }

    #[test]
    fn bogus_sort_falls_back_to_newest() {
        assert_eq!(SortKey::parse(Some("bogus-value")), SortKey::Newest);
        assert_eq!(SortKey::parse(None), SortKey::Newest);
        assert_eq!(
            SortKey::parse(Some("bogus-value")).order_clause(),
            SortKey::Newest.order_clause()
        );
    }

    #[test]
    fn sort_key_mapping() {
        assert_eq!(SortKey::parse(Some("price-low")).order_clause(), "current_price ASC");
        assert_eq!(SortKey::parse(Some("price-high")).order_clause(), "current_price DESC");
        assert_eq!(SortKey::parse(Some("name")).order_clause(), "name ASC");
        assert_eq!(SortKey::parse(Some("rating")).order_clause(), "rating DESC");
        assert_eq!(SortKey::parse(Some("newest")).order_clause(), "created_at DESC");
    }

    #[test]
    fn invalid_category_id_is_rejected() {
        let params = ListParams {
            category: Some("not a valid id!".to_string()),
            ..Default::default()
        };
        assert!(params.normalize().is_err());
    }

    #[test]
    fn out_of_range_limit_is_rejected() {
        let params = ListParams {
            limit: Some("101".to_string()),
            ..Default::default()
        };
        assert!(params.normalize().is_err());

        let advanced = AdvancedSearchParams {
            limit: Some("51".to_string()),
            ..Default::default()
        };
        assert!(advanced.normalize().is_err());
    }

    #[test]
    fn search_text_is_lowercased_and_trimmed() {
        let params = ListParams {
            search: Some("  GaMiNg LapTOP ".to_string()),
            ..Default::default()
        };
        let filter = params.normalize().unwrap();
        assert_eq!(filter.search.as_deref(), Some("gaming laptop"));
    }

    #[test]
    fn quick_search_requires_q() {
        let params = QuickSearchParams::default();
        assert!(params.normalize(SEARCH_MAX_LIMIT, SEARCH_DEFAULT_LIMIT).is_err());

        let params = QuickSearchParams {
            q: Some("mouse".to_string()),
            limit: None,
        };
        let (q, limit) = params.normalize(SEARCH_MAX_LIMIT, SEARCH_DEFAULT_LIMIT).unwrap();
        assert_eq!(q, "mouse");
        assert_eq!(limit, SEARCH_DEFAULT_LIMIT);
    }
}
