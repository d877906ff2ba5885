//! Product catalog repository.
//!
//! Stock and the rating aggregates on each row are maintained elsewhere
//! (order placement and the rating repository); this module covers catalog
//! CRUD and search.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use clover_core::ProductId;

use super::RepositoryError;
use crate::models::product::{CreateProductInput, Product, UpdateProductInput};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    brand: String,
    price: Decimal,
    short_description: String,
    long_description: String,
    stock: i32,
    category: String,
    cover_image: String,
    other_images: Vec<String>,
    avg_rating: Decimal,
    total_ratings: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            brand: row.brand,
            price: row.price,
            short_description: row.short_description,
            long_description: row.long_description,
            stock: row.stock,
            category: row.category,
            cover_image: row.cover_image,
            other_images: row.other_images,
            avg_rating: row.avg_rating,
            total_ratings: row.total_ratings,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, brand, price, short_description, long_description, \
     stock, category, cover_image, other_images, avg_rating, total_ratings, \
     created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new catalog entry with zeroed rating aggregates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &CreateProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products
                 (name, brand, price, short_description, long_description,
                  stock, category, cover_image, other_images)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.brand)
        .bind(input.price)
        .bind(&input.short_description)
        .bind(&input.long_description)
        .bind(input.stock)
        .bind(&input.category)
        .bind(&input.cover_image)
        .bind(&input.other_images)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List the whole catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Case-insensitive substring search across category, name and brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        // Escape LIKE metacharacters so "100%" searches literally.
        let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        let pattern = format!("%{escaped}%");

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE category ILIKE $1 OR name ILIKE $1 OR brand ILIKE $1
             ORDER BY created_at DESC"
        ))
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Apply a partial catalog update. `None` fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET
                 name = COALESCE($2, name),
                 brand = COALESCE($3, brand),
                 price = COALESCE($4, price),
                 short_description = COALESCE($5, short_description),
                 long_description = COALESCE($6, long_description),
                 stock = COALESCE($7, stock),
                 category = COALESCE($8, category),
                 cover_image = COALESCE($9, cover_image),
                 other_images = COALESCE($10, other_images)
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.brand.as_deref())
        .bind(input.price)
        .bind(input.short_description.as_deref())
        .bind(input.long_description.as_deref())
        .bind(input.stock)
        .bind(input.category.as_deref())
        .bind(input.cover_image.as_deref())
        .bind(input.other_images.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product. Cart lines and ratings cascade; order line items
    /// keep their price snapshot and reference the product by id only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
