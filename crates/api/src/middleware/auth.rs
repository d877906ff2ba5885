//! Authentication extractors.
//!
//! `RequireUser` reads the session and yields the logged-in user's identity;
//! `RequireAdmin` additionally loads the user row and checks the role, so a
//! demotion takes effect on the next request rather than at next login.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use clover_core::{Role, UserId};

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// Session keys.
pub mod session_keys {
    /// Key under which the logged-in user's identity is stored.
    pub const CURRENT_USER: &str = "current_user";
}

/// The logged-in user's identity, as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    /// Role at login time; admin routes re-check against the database.
    pub role: Role,
}

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("user {}", user.id)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)
            .await
            .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))?;

        Ok(Self(user))
    }
}

/// Extractor that requires an admin user.
///
/// Loads the full user row and checks the role in the database, so the
/// session alone can never grant admin access.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = current_user(parts)
            .await
            .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))?;

        let user = UserRepository::new(state.pool())
            .get_by_id(current.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))?;

        if !user.role.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(Self(user))
    }
}

/// Read the current user from the request's session, if any.
async fn current_user(parts: &mut Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Store the logged-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Destroy the session (logout).
///
/// # Errors
///
/// Returns an error if the session store rejects the deletion.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
