//! Order total arithmetic.
//!
//! Pure functions over `Decimal`; the order repository applies these inside
//! the placement transaction.

use rust_decimal::{Decimal, RoundingStrategy};

/// Orders above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Flat shipping charge below the free-shipping threshold.
pub const SHIPPING_FLAT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Tax rate applied to the subtotal (5%).
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// The derived charges for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute shipping, tax and the grand total for a subtotal.
///
/// Tax is rounded half-up to whole currency units.
#[must_use]
pub fn order_totals(subtotal: Decimal) -> OrderTotals {
    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        SHIPPING_FLAT
    };

    let tax = (subtotal * TAX_RATE)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    OrderTotals {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal")
    }

    #[test]
    fn test_totals_below_free_shipping() {
        let totals = order_totals(dec("300"));
        assert_eq!(totals.shipping, dec("50"));
        assert_eq!(totals.tax, dec("15"));
        assert_eq!(totals.total, dec("365"));
    }

    #[test]
    fn test_totals_above_free_shipping() {
        let totals = order_totals(dec("600"));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.tax, dec("30"));
        assert_eq!(totals.total, dec("630"));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Exactly 500 still pays shipping.
        let totals = order_totals(dec("500"));
        assert_eq!(totals.shipping, dec("50"));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 250 * 0.05 = 12.50, a midpoint: half-up gives 13
        let totals = order_totals(dec("250"));
        assert_eq!(totals.tax, dec("13"));
        assert_eq!(totals.total, dec("313"));

        // 248 * 0.05 = 12.40 -> 12
        let totals = order_totals(dec("248"));
        assert_eq!(totals.tax, dec("12"));
    }

    #[test]
    fn test_zero_subtotal() {
        let totals = order_totals(Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, dec("50"));
    }
}
