//! Database operations for the Clover `PostgreSQL` database.
//!
//! # Tables
//!
//! - `users` - Accounts, profile, shipping address, role, reset tokens
//! - `tower_sessions.session` - Session storage (tower-sessions)
//! - `products` - Catalog entries with denormalized rating aggregates
//! - `cart_items` - Per-user cart lines, UNIQUE (user_id, product_id)
//! - `orders` / `order_items` - Orders with price/address snapshots
//! - `ratings` - One rating per (product, user)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p clover-cli -- migrate
//! ```

pub mod analytics;
pub mod carts;
pub mod orders;
pub mod products;
pub mod ratings;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::AnalyticsRepository;
pub use carts::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use ratings::RatingRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, duplicate rating).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An order line asked for more units than are in stock. The message
    /// names the product.
    #[error("{0}")]
    InsufficientStock(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
