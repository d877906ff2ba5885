//! Cart models.
//!
//! A user's cart is the set of their `cart_items` rows; totals are derived
//! on read and never cached.

use rust_decimal::Decimal;
use serde::Serialize;

use clover_core::{CartItemId, ProductId};

/// One cart line joined with its product's current catalog data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub cover_image: String,
    pub stock: i32,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// The full cart for a user, with the subtotal derived from current prices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
}

impl CartView {
    /// Build a view from lines, summing line totals.
    #[must_use]
    pub fn new(items: Vec<CartLine>) -> Self {
        let subtotal = items.iter().map(|l| l.line_total).sum();
        Self { items, subtotal }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product_id: i32, price: Decimal, quantity: i32) -> CartLine {
        CartLine {
            id: CartItemId::new(product_id),
            product_id: ProductId::new(product_id),
            name: "item".to_string(),
            brand: "brand".to_string(),
            price,
            cover_image: String::new(),
            stock: 10,
            quantity,
            line_total: price * Decimal::from(quantity),
        }
    }

    #[test]
    fn test_cart_view_subtotal() {
        let view = CartView::new(vec![
            line(1, Decimal::new(100_00, 2), 2),
            line(2, Decimal::new(49_50, 2), 1),
        ]);
        assert_eq!(view.subtotal, Decimal::new(249_50, 2));
    }

    #[test]
    fn test_empty_cart_has_zero_subtotal() {
        let view = CartView::new(Vec::new());
        assert!(view.items.is_empty());
        assert_eq!(view.subtotal, Decimal::ZERO);
    }
}
