//! Search facets
//!
//! Aggregates returned by the advanced search endpoint (under its
//! `filters` key) to populate the UI filter controls. The price range
//! is computed over all active
//! products, not the currently-filtered subset. The unscoped range is
//! established client-facing behavior and is kept as is.

use serde::Serialize;

/// Min/max of `current_price` across active products
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_price: f64,
    pub max_price: f64,
}

/// Facet block for the advanced search response
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub price_range: PriceRange,
    /// Distinct non-empty brands, lexicographically sorted
    pub brands: Vec<String>,
}

impl Facets {
    /// Normalize a raw brand list: drop empties, dedupe, sort.
    pub fn normalize_brands(mut brands: Vec<String>) -> Vec<String> {
        brands.retain(|b| !b.trim().is_empty());
        brands.sort();
        brands.dedup();
        brands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brands_are_sorted_and_free_of_empties() {
        let brands = Facets::normalize_brands(vec![
            "Sony".to_string(),
            "".to_string(),
            "Acme".to_string(),
            "  ".to_string(),
            "Sony".to_string(),
            "Logitech".to_string(),
        ]);
        assert_eq!(brands, vec!["Acme", "Logitech", "Sony"]);
    }
}
