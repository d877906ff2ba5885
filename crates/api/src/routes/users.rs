//! Account route handlers: signup, login, profile, password flows.

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use clover_core::Email;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::auth::{CurrentUser, RequireUser, clear_session, set_current_user};
use crate::middleware::session::REMEMBER_ME_EXPIRY_SECONDS;
use crate::models::user::UpdateProfileInput;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /user/userSignup`
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let user = AuthService::new(state.pool())
        .signup(&body.first_name, &body.last_name, &body.email, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Account created",
            "user": user,
        })),
    ))
}

/// `POST /user/userlogin`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    if body.remember_me {
        session.set_expiry(Some(tower_sessions::Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(REMEMBER_ME_EXPIRY_SECONDS),
        )));
    }

    set_current_user(
        &session,
        &CurrentUser {
            id: user.id,
            role: user.role,
        },
    )
    .await
    .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    Ok(Json(json!({
        "success": true,
        "message": "Logged in",
        "user": user,
    })))
}

/// `GET /user/userLogout`
pub async fn logout(_user: RequireUser, session: Session) -> Result<Json<Value>> {
    clear_session(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session flush failed: {e}")))?;

    Ok(Json(json!({
        "success": true,
        "message": "Logged out",
    })))
}

/// `GET /user/userProfile`
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "user": user,
    })))
}

/// `POST /user/editProfile`
pub async fn edit_profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<UpdateProfileInput>,
) -> Result<Json<Value>> {
    // A new email must parse before it reaches the database.
    let email = body
        .email
        .as_deref()
        .map(Email::parse)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = UserRepository::new(state.pool())
        .update_profile(current.id, &body, email.as_ref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated",
        "user": user,
    })))
}

/// `POST /user/forgotPassword`
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>> {
    let (user, token) = AuthService::new(state.pool())
        .start_password_reset(&body.email)
        .await?;

    let reset_link = format!("{}/resetPassword?token={token}", state.config().base_url);

    if let Some(mailer) = state.mailer() {
        mailer
            .send_password_reset(&user.email, &user.first_name, &reset_link)
            .await
            .map_err(|e| AppError::Internal(format!("reset email failed: {e}")))?;
    } else {
        tracing::warn!(user_id = %user.id, "SMTP not configured, skipping reset email");
    }

    Ok(Json(json!({
        "success": true,
        "message": "Password reset email sent",
    })))
}

/// `POST /user/resetPassword`
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<Value>> {
    AuthService::new(state.pool())
        .reset_password(&body.token, &body.new_password, &body.confirm_password)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password has been reset",
    })))
}

/// `POST /user/resetPasswordFromProfile`
pub async fn reset_password_from_profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>> {
    AuthService::new(state.pool())
        .change_password(
            current.id,
            &body.old_password,
            &body.new_password,
            &body.confirm_password,
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password has been changed",
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_rejects_unknown_fields() {
        let json = r#"{"firstName":"A","lastName":"B","email":"a@b.c",
            "password":"longenough","role":"admin"}"#;
        assert!(serde_json::from_str::<SignupRequest>(json).is_err());
    }

    #[test]
    fn test_login_remember_me_defaults_false() {
        let body: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.c","password":"pw"}"#).unwrap();
        assert!(!body.remember_me);
    }
}
