//! Search API Handlers
//!
//! Three tiers: quick search (`/products`), typeahead
//! (`/suggestions`) and the faceted `/advanced` endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;

use crate::catalog::{
    AdvancedSearchParams, Facets, Pagination, QuickSearchParams, build_query, build_quick_search,
    filter::{SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT, SUGGESTION_DEFAULT_LIMIT, SUGGESTION_MAX_LIMIT},
};
use crate::core::ServerState;
use crate::db::models::Product;
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::utils::{AppError, AppResult};

/// One typeahead entry. `kind` tells the UI which group it came from.
#[derive(Serialize)]
pub struct SuggestionEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub products: Vec<SuggestionEntry>,
    pub categories: Vec<SuggestionEntry>,
    pub brands: Vec<SuggestionEntry>,
}

#[derive(Serialize)]
pub struct AdvancedSearchResponse {
    pub products: Vec<Product>,
    pub pagination: Pagination,
    pub filters: Facets,
}

/// GET /api/search/products - quick text search, name-ordered page
pub async fn products(
    State(state): State<ServerState>,
    Query(params): Query<QuickSearchParams>,
) -> AppResult<Json<Vec<Product>>> {
    let (q, limit) = params.normalize(SEARCH_MAX_LIMIT, SEARCH_DEFAULT_LIMIT)?;
    let query = build_quick_search(&q, limit);

    let repo = ProductRepository::new(state.get_db());
    let (products, _) = repo
        .find_page(&query)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(products))
}

/// GET /api/search/suggestions - typeahead across products, categories
/// and brands. Product names take the full limit; the two secondary
/// groups get half each.
pub async fn suggestions(
    State(state): State<ServerState>,
    Query(params): Query<QuickSearchParams>,
) -> AppResult<Json<SuggestionsResponse>> {
    let (q, limit) = params.normalize(SUGGESTION_MAX_LIMIT, SUGGESTION_DEFAULT_LIMIT)?;
    let secondary_limit = (limit / 2).max(1);

    let products = ProductRepository::new(state.get_db());
    let categories = CategoryRepository::new(state.get_db());

    let product_names = products
        .suggest_names(&q, limit)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let category_names = categories
        .suggest_names(&q, secondary_limit)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let brands = products
        .suggest_brands(&q, secondary_limit)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(SuggestionsResponse {
        products: product_names
            .into_iter()
            .map(|(id, name)| SuggestionEntry {
                kind: "product",
                value: name,
                id: Some(id),
            })
            .collect(),
        categories: category_names
            .into_iter()
            .map(|(id, name)| SuggestionEntry {
                kind: "category",
                value: name,
                id: Some(id),
            })
            .collect(),
        brands: brands
            .into_iter()
            .map(|brand| SuggestionEntry {
                kind: "brand",
                value: brand,
                id: None,
            })
            .collect(),
    }))
}

/// GET /api/search/advanced - filtered search with facets
pub async fn advanced(
    State(state): State<ServerState>,
    Query(params): Query<AdvancedSearchParams>,
) -> AppResult<Json<AdvancedSearchResponse>> {
    let filter = params.normalize()?;
    let query = build_query(&filter);

    let repo = ProductRepository::new(state.get_db());
    let (products, total) = repo
        .find_page(&query)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // Facets describe the whole active catalog, not the filtered page
    let price_range = repo
        .price_range()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let brands = repo
        .distinct_brands()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(AdvancedSearchResponse {
        products,
        pagination: Pagination::new(filter.window.page, filter.window.limit, total),
        filters: Facets {
            price_range,
            brands: Facets::normalize_brands(brands),
        },
    }))
}
