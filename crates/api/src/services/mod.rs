//! Business logic services.
//!
//! Services sit between route handlers and repositories: `auth` owns
//! password handling and reset tokens, `email` owns SMTP delivery, and
//! `pricing` is the pure order-total arithmetic.

pub mod auth;
pub mod email;
pub mod pricing;

pub use auth::{AuthError, AuthService};
pub use email::{EmailError, EmailService};
