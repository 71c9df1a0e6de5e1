//! Catalog query building
//!
//! The listing/search core: request parameters are normalized once
//! into a [`ProductFilter`], composed into a [`ProductQuery`]
//! (predicate set + sort + window), and executed by the product
//! repository. Facet aggregates and pagination metadata live here too.

pub mod facets;
pub mod filter;
pub mod pagination;
pub mod query;

pub use facets::{Facets, PriceRange};
pub use filter::{AdvancedSearchParams, ListParams, PageWindow, ProductFilter, QuickSearchParams, SortKey};
pub use pagination::Pagination;
pub use query::{BindValue, ProductQuery, build_query, build_quick_search};
