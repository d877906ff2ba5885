//! Admin access management.

use clover_core::Role;

use super::CommandError;

/// Grant the admin role to the account with this email.
///
/// # Errors
///
/// Returns an error if the database is unreachable or no account uses the
/// given email.
pub async fn promote(email: &str) -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let result = sqlx::query("UPDATE users SET role = $2 WHERE email = $1")
        .bind(email)
        .bind(Role::Admin.as_str())
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CommandError::Invalid(format!(
            "no account found for {email}"
        )));
    }

    tracing::info!(email = %email, "Account promoted to admin");
    Ok(())
}
