//! Pagination metadata

use serde::Serialize;

/// Pagination block returned alongside every product page
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_products: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = total.div_ceil(limit as u64) as u32;
        Self {
            current_page: page,
            total_pages,
            total_products: total,
            has_next_page: (page as u64) * (limit as u64) < total,
            has_prev_page: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        let p = Pagination::new(1, 12, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_prev_page);

        let p = Pagination::new(1, 12, 12);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next_page);

        let p = Pagination::new(1, 12, 13);
        assert_eq!(p.total_pages, 2);
        assert!(p.has_next_page);

        let p = Pagination::new(2, 12, 13);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);
    }

    #[test]
    fn has_next_matches_skip_arithmetic() {
        for page in 1..6u32 {
            for total in [0u64, 5, 12, 24, 25, 100] {
                let p = Pagination::new(page, 12, total);
                assert_eq!(p.has_next_page, (page as u64) * 12 < total);
                assert_eq!(p.has_prev_page, page > 1);
            }
        }
    }
}
