//! Admin user management handlers.

use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use clover_core::{Role, UserId};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoleUpdateRequest {
    pub user_id: UserId,
}

/// `GET /admin/user/showAllUser`
pub async fn show_all(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Value>> {
    let users = UserRepository::new(state.pool()).list_all().await?;

    Ok(Json(json!({
        "success": true,
        "users": users,
    })))
}

/// `POST /admin/user/roleUpdateToAdmin`
///
/// Toggles the target's role: a customer becomes an admin, and an admin is
/// demoted back to customer. Demotion takes effect on the target's next
/// request because admin routes re-check the role in the database.
pub async fn toggle_admin_role(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<RoleUpdateRequest>,
) -> Result<Json<Value>> {
    let repo = UserRepository::new(state.pool());

    let target = repo
        .get_by_id(body.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let new_role = if target.role.is_admin() {
        Role::User
    } else {
        Role::Admin
    };

    let user = repo.set_role(body.user_id, new_role).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "Role updated");

    Ok(Json(json!({
        "success": true,
        "message": format!("Role updated to {}", user.role),
        "user": user,
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_update_request_rejects_role_field() {
        // The new role is derived from the current one, never client-supplied.
        let json = r#"{"userId":4,"role":"admin"}"#;
        assert!(serde_json::from_str::<RoleUpdateRequest>(json).is_err());
    }
}
