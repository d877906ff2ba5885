//! Read-only revenue analytics models.
//!
//! All three reports exclude cancelled orders.

use rust_decimal::Decimal;
use serde::Serialize;

/// Revenue bucketed by calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthRevenue {
    /// Three-letter month label ("Jan".."Dec").
    pub month: &'static str,
    pub revenue: Decimal,
}

/// Month labels indexed by `EXTRACT(MONTH ...)` - 1.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label for a 1-based month number, if in range.
#[must_use]
pub fn month_label(month: i32) -> Option<&'static str> {
    usize::try_from(month.checked_sub(1)?)
        .ok()
        .and_then(|i| MONTH_LABELS.get(i).copied())
}

/// Revenue bucketed by product category, via the join from order line items
/// to products.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Decimal,
    /// Number of order line items contributing to the bucket.
    pub orders: i64,
}

/// One of the top products by units sold.
#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub name: String,
    pub sales: i64,
    pub revenue: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_label_range() {
        assert_eq!(month_label(1), Some("Jan"));
        assert_eq!(month_label(12), Some("Dec"));
        assert_eq!(month_label(0), None);
        assert_eq!(month_label(13), None);
    }
}
