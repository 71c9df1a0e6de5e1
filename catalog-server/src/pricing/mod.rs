//! Dynamic pricing engine
//!
//! Computes the per-visitor displayed price from a product's base price
//! and the visitor's session-scoped view count. Pure functions, no I/O;
//! all monetary arithmetic uses `Decimal` internally and converts back
//! to `f64` for storage/serialization.
//!
//! The view count is deliberately scoped to one browser session (not a
//! user profile, not global popularity): price pressure reflects the
//! apparent interest of the current browsing session, and clearing the
//! session cookie resets it. The caller increments the session ledger
//! before calling in here, so the count already includes the current
//! request's view.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Visits per 10% price step
const VISITS_PER_LEVEL: u32 = 3;

/// Price increase per level (10%)
const STEP: Decimal = Decimal::from_parts(1, 0, 0, false, 1); // 0.1

/// Maximum multiplier (+50%, reached at 15 visits)
const MAX_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1); // 1.5

/// Price multiplier for a given session view count.
///
/// Below [`VISITS_PER_LEVEL`] views the price is unchanged; after that
/// every full level adds 10%, capped at [`MAX_MULTIPLIER`].
pub fn visit_multiplier(session_visits: u32) -> Decimal {
    if session_visits < VISITS_PER_LEVEL {
        return Decimal::ONE;
    }
    let level = Decimal::from(session_visits / VISITS_PER_LEVEL);
    (Decimal::ONE + level * STEP).min(MAX_MULTIPLIER)
}

/// Compute the displayed price for one visitor.
///
/// `base_price` is assumed validated upstream (finite, non-negative).
/// The result is rounded to cents, half-up.
pub fn compute_display_price(base_price: f64, session_visits: u32) -> f64 {
    let base = Decimal::from_f64(base_price).unwrap_or(Decimal::ZERO);
    let price = (base * visit_multiplier(session_visits))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    price.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_adjustment_below_three_visits() {
        for v in 0..3 {
            assert_eq!(compute_display_price(89.99, v), 89.99);
        }
    }

    #[test]
    fn ten_percent_per_level() {
        // 89.99 * 1.10 = 98.989 -> 98.99
        assert_eq!(compute_display_price(89.99, 3), 98.99);
        assert_eq!(compute_display_price(89.99, 4), 98.99);
        assert_eq!(compute_display_price(89.99, 5), 98.99);
        // 89.99 * 1.20 = 107.988 -> 107.99
        assert_eq!(compute_display_price(89.99, 6), 107.99);
    }

    #[test]
    fn cap_at_fifty_percent() {
        // 89.99 * 1.5 = 134.985 -> 134.99, capped from 15 visits on
        assert_eq!(compute_display_price(89.99, 15), 134.99);
        assert_eq!(compute_display_price(89.99, 30), 134.99);
        assert_eq!(compute_display_price(89.99, 1_000_000), 134.99);
        assert_eq!(visit_multiplier(u32::MAX), MAX_MULTIPLIER);
    }

    #[test]
    fn monotone_in_visits() {
        let mut last = 0.0;
        for v in 0..40 {
            let price = compute_display_price(49.50, v);
            assert!(price >= last, "price dropped at {v} visits");
            last = price;
        }
    }

    #[test]
    fn zero_base_price_stays_zero() {
        assert_eq!(compute_display_price(0.0, 0), 0.0);
        assert_eq!(compute_display_price(0.0, 21), 0.0);
    }

    #[test]
    fn pure_and_deterministic() {
        for _ in 0..3 {
            assert_eq!(compute_display_price(12.34, 9), compute_display_price(12.34, 9));
        }
    }

    #[test]
    fn half_up_on_the_cent_boundary() {
        // 10.05 * 1.1 = 11.055 -> 11.06 (half-up, not banker's)
        assert_eq!(compute_display_price(10.05, 3), 11.06);
    }
}
