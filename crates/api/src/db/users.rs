//! User repository for database operations.
//!
//! Accounts, profile data, the flattened shipping address, roles and
//! password-reset tokens all live on the `users` table. Password hashes are
//! only exposed through the credential lookups and never leave the auth
//! service.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use clover_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::user::{Address, PhoneNumber, UpdateProfileInput, User};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    phone_isd_code: Option<String>,
    phone_number: Option<String>,
    avatar_url: Option<String>,
    address_city: Option<String>,
    address_locality: Option<String>,
    address_state: Option<String>,
    address_country: Option<String>,
    address_pincode: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let role: Role = row.role.parse().map_err(RepositoryError::DataCorruption)?;

        let phone_number = match (row.phone_isd_code, row.phone_number) {
            (Some(isd_code), Some(number)) => Some(PhoneNumber { isd_code, number }),
            _ => None,
        };

        let address = match (
            row.address_city,
            row.address_locality,
            row.address_state,
            row.address_country,
            row.address_pincode,
        ) {
            (Some(city), Some(locality), Some(state), Some(country), Some(pincode)) => {
                Some(Address {
                    city,
                    locality,
                    state,
                    country,
                    pincode,
                })
            }
            _ => None,
        };

        Ok(Self {
            id: UserId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            phone_number,
            avatar: row.avatar_url,
            address,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row type carrying the password hash alongside the profile, for login.
#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    id: i32,
    password_hash: String,
    role: String,
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, \
     phone_isd_code, phone_number, avatar_url, \
     address_city, address_locality, address_state, address_country, address_pincode, \
     role, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user account with the customer role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (first_name, last_name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Look up the stored password hash and role for a login attempt.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role is invalid.
    pub async fn credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(UserId, String, Role)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, password_hash, role FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            let role: Role = r.role.parse().map_err(RepositoryError::DataCorruption)?;
            Ok((UserId::new(r.id), r.password_hash, role))
        })
        .transpose()
    }

    /// Look up the stored password hash by user ID, for in-profile password
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn password_hash_by_id(&self, id: UserId) -> Result<String, RepositoryError> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Apply a partial profile update. `None` fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        input: &UpdateProfileInput,
        email: Option<&Email>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET
                 first_name = COALESCE($2, first_name),
                 last_name = COALESCE($3, last_name),
                 email = COALESCE($4, email),
                 phone_isd_code = COALESCE($5, phone_isd_code),
                 phone_number = COALESCE($6, phone_number),
                 address_city = COALESCE($7, address_city),
                 address_locality = COALESCE($8, address_locality),
                 address_state = COALESCE($9, address_state),
                 address_country = COALESCE($10, address_country),
                 address_pincode = COALESCE($11, address_pincode)
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(input.first_name.as_deref())
        .bind(input.last_name.as_deref())
        .bind(email.map(Email::as_str))
        .bind(input.phone_number.as_ref().map(|p| p.isd_code.as_str()))
        .bind(input.phone_number.as_ref().map(|p| p.number.as_str()))
        .bind(input.address.as_ref().map(|a| a.city.as_str()))
        .bind(input.address.as_ref().map(|a| a.locality.as_str()))
        .bind(input.address.as_ref().map(|a| a.state.as_str()))
        .bind(input.address.as_ref().map(|a| a.country.as_str()))
        .bind(input.address.as_ref().map(|a| a.pincode.as_str()))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Replace the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Store a password-reset token for the account with this email.
    ///
    /// Returns the user so the caller can address the reset email. Any
    /// previous token is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account uses this email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_reset_token(
        &self,
        email: &Email,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET reset_token = $2, reset_token_expires_at = $3
             WHERE email = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(token)
        .bind(expires_at)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Find the user holding an unexpired reset token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_valid_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<UserId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM users
             WHERE reset_token = $1 AND reset_token_expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(id.map(UserId::new))
    }

    /// Clear any stored reset token, after a successful reset.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_reset_token(&self, id: UserId) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE users SET reset_token = NULL, reset_token_expires_at = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List every account, newest first (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Set an account's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_role(&self, id: UserId, role: Role) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET role = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
