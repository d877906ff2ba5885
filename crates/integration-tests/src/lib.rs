//! Integration tests for Clover Market.
//!
//! # Running Tests
//!
//! The wire-contract tests run anywhere. The live API tests need a running
//! server and skip themselves when `CLOVER_BASE_URL` is unset:
//!
//! ```bash
//! # Terminal 1: start the API against a migrated database
//! cargo run -p clover-cli -- migrate
//! cargo run -p clover-api
//!
//! # Terminal 2: point the tests at it
//! CLOVER_BASE_URL=http://127.0.0.1:8080 cargo test -p clover-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `wire_contract` - serde contracts shared with API clients
//! - `health` - liveness and readiness endpoints
//! - `storefront_flow` - signup, login, catalog, and cart against a live server
//! - `order_flow` - stock, checkout, and rating invariants; additionally needs
//!   `CLOVER_ADMIN_EMAIL`/`CLOVER_ADMIN_PASSWORD` for an account promoted via
//!   `cargo run -p clover-cli -- admin promote <email>`

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;

/// Environment variable naming the base URL of a running API server.
pub const BASE_URL_ENV: &str = "CLOVER_BASE_URL";

/// Environment variable naming an existing admin account's email.
pub const ADMIN_EMAIL_ENV: &str = "CLOVER_ADMIN_EMAIL";

/// Environment variable holding that admin account's password.
pub const ADMIN_PASSWORD_ENV: &str = "CLOVER_ADMIN_PASSWORD";

/// A live API under test, reachable over HTTP.
pub struct TestApi {
    /// Cookie-aware client, so the session survives across requests.
    pub client: Client,
    base_url: String,
}

impl TestApi {
    /// Connect to the server named by `CLOVER_BASE_URL`, or `None` when the
    /// variable is unset so live tests can skip themselves.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var(BASE_URL_ENV).ok().filter(|s| !s.is_empty())?;
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("reqwest client");
        Some(Self { client, base_url })
    }

    /// Build a full URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Connect with a fresh cookie jar and log in as the admin named by
    /// `CLOVER_ADMIN_EMAIL`/`CLOVER_ADMIN_PASSWORD`.
    ///
    /// Returns `None` when the base URL or either credential variable is
    /// unset, so catalog-managing tests can skip themselves. A rejected
    /// login panics instead: configured-but-wrong credentials are a setup
    /// bug, not a reason to skip.
    pub async fn admin_from_env() -> Option<Self> {
        let api = Self::from_env()?;
        let email = std::env::var(ADMIN_EMAIL_ENV).ok().filter(|s| !s.is_empty())?;
        let password = std::env::var(ADMIN_PASSWORD_ENV)
            .ok()
            .filter(|s| !s.is_empty())?;

        let resp = api
            .client
            .post(api.url("/user/userlogin"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("admin login request");
        assert_eq!(
            resp.status(),
            200,
            "admin login rejected, check {ADMIN_EMAIL_ENV}/{ADMIN_PASSWORD_ENV}"
        );

        Some(api)
    }
}

/// An email address unique to this test run, for signup tests that hit a
/// shared database.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    format!("{prefix}-{nanos}@test.clover.market")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_email_parses() {
        let email = unique_email("signup");
        assert!(clover_core::Email::parse(&email).is_ok());
        assert!(email.starts_with("signup-"));
    }

    #[test]
    fn test_unique_emails_differ() {
        assert_ne!(unique_email("a"), unique_email("a"));
    }
}
