//! Rating repository.
//!
//! Every write re-derives the owning product's `avg_rating` and
//! `total_ratings` in the same transaction with a single UPDATE, so
//! concurrent submissions serialize on the product row and the aggregates
//! can never drift from the ratings table.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use clover_core::{ProductId, RatingId, UserId};

use super::RepositoryError;
use crate::models::rating::{Rating, RatingWithAuthor};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` rating queries.
#[derive(Debug, sqlx::FromRow)]
struct RatingRow {
    id: i32,
    product_id: i32,
    user_id: i32,
    rating: i16,
    review: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Self {
            id: RatingId::new(row.id),
            product_id: ProductId::new(row.product_id),
            user_id: UserId::new(row.user_id),
            rating: row.rating,
            review: row.review,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for ratings joined with the author's profile.
#[derive(Debug, sqlx::FromRow)]
struct RatingWithAuthorRow {
    #[sqlx(flatten)]
    rating: RatingRow,
    first_name: String,
    last_name: String,
    avatar_url: Option<String>,
}

impl From<RatingWithAuthorRow> for RatingWithAuthor {
    fn from(row: RatingWithAuthorRow) -> Self {
        Self {
            rating: row.rating.into(),
            first_name: row.first_name,
            last_name: row.last_name,
            avatar: row.avatar_url,
        }
    }
}

const RATING_COLUMNS: &str = "id, product_id, user_id, rating, review, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for rating database operations.
pub struct RatingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RatingRepository<'a> {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a rating and refresh the product's aggregates, atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if this user already rated the
    /// product, `RepositoryError::NotFound` if the product doesn't exist,
    /// and `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        product_id: ProductId,
        user_id: UserId,
        rating: i16,
        review: Option<&str>,
    ) -> Result<Rating, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, RatingRow>(&format!(
            "INSERT INTO ratings (product_id, user_id, rating, review)
             VALUES ($1, $2, $3, $4)
             RETURNING {RATING_COLUMNS}"
        ))
        .bind(product_id)
        .bind(user_id)
        .bind(rating)
        .bind(review)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return RepositoryError::Conflict(
                        "product already rated by this user".to_owned(),
                    );
                }
                if db_err.is_foreign_key_violation() {
                    return RepositoryError::NotFound;
                }
            }
            RepositoryError::Database(e)
        })?;

        refresh_aggregates(&mut tx, product_id).await?;
        tx.commit().await?;

        Ok(row.into())
    }

    /// Update the user's existing rating of a product and refresh the
    /// product's aggregates, atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user hasn't rated this
    /// product. Returns `RepositoryError::Database` for other errors.
    pub async fn update_for_user(
        &self,
        product_id: ProductId,
        user_id: UserId,
        rating: i16,
        review: Option<&str>,
    ) -> Result<Rating, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, RatingRow>(&format!(
            "UPDATE ratings SET rating = $3, review = COALESCE($4, review)
             WHERE product_id = $1 AND user_id = $2
             RETURNING {RATING_COLUMNS}"
        ))
        .bind(product_id)
        .bind(user_id)
        .bind(rating)
        .bind(review)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        refresh_aggregates(&mut tx, product_id).await?;
        tx.commit().await?;

        Ok(row.into())
    }

    /// List a product's ratings with author name and avatar, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<RatingWithAuthor>, RepositoryError> {
        let rows = sqlx::query_as::<_, RatingWithAuthorRow>(
            "SELECT r.id, r.product_id, r.user_id, r.rating, r.review,
                    r.created_at, r.updated_at,
                    u.first_name, u.last_name, u.avatar_url
             FROM ratings r
             JOIN users u ON u.id = r.user_id
             WHERE r.product_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Recompute a product's rating aggregates from the ratings table.
///
/// One statement, both fields; `COALESCE` resets the average to 0 when the
/// last rating disappears.
async fn refresh_aggregates(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "UPDATE products SET
             avg_rating = COALESCE(
                 (SELECT ROUND(AVG(rating), 1) FROM ratings WHERE product_id = $1), 0),
             total_ratings =
                 (SELECT COUNT(*) FROM ratings WHERE product_id = $1)
         WHERE id = $1",
    )
    .bind(product_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
