//! HTTP middleware and request extractors.

pub mod auth;
pub mod session;

pub use auth::{CurrentUser, RequireAdmin, RequireUser};
pub use session::create_session_layer;
