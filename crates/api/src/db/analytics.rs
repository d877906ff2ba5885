//! Read-only revenue analytics queries.
//!
//! All reports exclude cancelled orders. Revenue comes from the order's
//! stored `total_amount` for the monthly report, and from line-item price
//! snapshots for the category and top-product breakdowns.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::analytics::{CategoryRevenue, MonthRevenue, TopProduct, month_label};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct MonthRevenueRow {
    month: i32,
    revenue: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRevenueRow {
    category: String,
    revenue: Decimal,
    orders: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct TopProductRow {
    name: String,
    sales: i64,
    revenue: Decimal,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for revenue analytics queries.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Revenue per calendar month across all years, labeled Jan..Dec.
    /// Months with no orders are omitted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on an impossible month.
    pub async fn month_revenue(&self) -> Result<Vec<MonthRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, MonthRevenueRow>(
            "SELECT EXTRACT(MONTH FROM created_at)::INT AS month,
                    SUM(total_amount) AS revenue
             FROM orders
             WHERE status <> 'cancelled'
             GROUP BY month
             ORDER BY month",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let month = month_label(row.month).ok_or_else(|| {
                    RepositoryError::DataCorruption(format!("month out of range: {}", row.month))
                })?;
                Ok(MonthRevenue {
                    month,
                    revenue: row.revenue,
                })
            })
            .collect()
    }

    /// Revenue per product category, highest first. `orders` counts the
    /// contributing line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_revenue(&self) -> Result<Vec<CategoryRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRevenueRow>(
            "SELECT p.category,
                    SUM(oi.price * oi.quantity) AS revenue,
                    COUNT(*) AS orders
             FROM order_items oi
             JOIN orders o ON o.id = oi.order_id
             JOIN products p ON p.id = oi.product_id
             WHERE o.status <> 'cancelled'
             GROUP BY p.category
             ORDER BY revenue DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryRevenue {
                category: row.category,
                revenue: row.revenue,
                orders: row.orders,
            })
            .collect())
    }

    /// The five best-selling products by units sold. Line items whose
    /// product has been deleted drop out of the join.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(&self) -> Result<Vec<TopProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopProductRow>(
            "SELECT p.name,
                    SUM(oi.quantity) AS sales,
                    SUM(oi.price * oi.quantity) AS revenue
             FROM order_items oi
             JOIN orders o ON o.id = oi.order_id
             JOIN products p ON p.id = oi.product_id
             WHERE o.status <> 'cancelled'
             GROUP BY p.id, p.name
             ORDER BY sales DESC
             LIMIT 5",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TopProduct {
                name: row.name,
                sales: row.sales,
                revenue: row.revenue,
            })
            .collect())
    }
}
