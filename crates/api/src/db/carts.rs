//! Cart repository.
//!
//! A cart is the set of `cart_items` rows for one user. The UNIQUE
//! (`user_id`, `product_id`) constraint lets "add to cart" be a single
//! upsert that increments the existing line.

use rust_decimal::Decimal;
use sqlx::PgPool;

use clover_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{CartLine, CartView};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for cart lines joined with product data.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    product_id: i32,
    name: String,
    brand: String,
    price: Decimal,
    cover_image: String,
    stock: i32,
    quantity: i32,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        let line_total = row.price * Decimal::from(row.quantity);
        Self {
            id: CartItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            name: row.name,
            brand: row.brand,
            price: row.price,
            cover_image: row.cover_image,
            stock: row.stock,
            quantity: row.quantity,
            line_total,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add one unit of a product to the user's cart.
    ///
    /// If the product is already in the cart, its quantity is incremented
    /// instead of inserting a second line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity)
             VALUES ($1, $2, 1)
             ON CONFLICT (user_id, product_id)
             DO UPDATE SET quantity = cart_items.quantity + 1",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Set the quantity of a cart line, clamped to the product's stock.
    ///
    /// Returns the quantity actually stored, which may be lower than the
    /// requested one when stock is short. When stock has run out entirely
    /// the clamp reaches 0, the line is removed (a stored quantity of 0
    /// would violate the table's `quantity >= 1` CHECK), and 0 is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product isn't in the cart.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<i32, RepositoryError> {
        let stored = sqlx::query_scalar::<_, i32>(
            "WITH target AS (
                 SELECT ci.id AS item_id, LEAST($3::INT, p.stock) AS clamped
                 FROM cart_items ci
                 JOIN products p ON p.id = ci.product_id
                 WHERE ci.user_id = $1 AND ci.product_id = $2
             ),
             updated AS (
                 UPDATE cart_items
                 SET quantity = target.clamped
                 FROM target
                 WHERE cart_items.id = target.item_id AND target.clamped > 0
             ),
             removed AS (
                 DELETE FROM cart_items
                 USING target
                 WHERE cart_items.id = target.item_id AND target.clamped <= 0
             )
             SELECT GREATEST(clamped, 0) FROM target",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(stored)
    }

    /// Remove a product from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product isn't in the cart.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Load the user's cart with current catalog prices and a derived
    /// subtotal. An empty cart is a valid, empty view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn view_for_user(&self, user_id: UserId) -> Result<CartView, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT ci.id, ci.product_id, p.name, p.brand, p.price,
                    p.cover_image, p.stock, ci.quantity
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.user_id = $1
             ORDER BY ci.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(CartView::new(rows.into_iter().map(Into::into).collect()))
    }

    /// Empty the user's cart, returning how many lines were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
