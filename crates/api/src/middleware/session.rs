//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions with signed
//! cookies. The default expiry is one day of inactivity; login extends it
//! to thirty days when the caller asks to be remembered.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::Key, service::SignedCookie};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ApiConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "clover_session";

/// Default session expiry in seconds (1 day).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Extended expiry in seconds for "remember me" logins (30 days).
pub const REMEMBER_ME_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store and signed cookies.
///
/// # Panics
///
/// Panics if the schema name or table name is invalid (cannot happen with
/// the hardcoded values), or if the session secret is shorter than the
/// 64 bytes the signing key needs (config validation enforces this).
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &ApiConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    // The session table is created via migration in the tower_sessions schema.
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("tower_sessions")
        .expect("valid schema name")
        .with_table_name("session")
        .expect("valid table name");

    let key = Key::from(config.session_secret.expose_secret().as_bytes());

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
