//! User account models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clover_core::{Email, Role, UserId};

/// A shipping address. Stored flattened on the `users` row and copied onto
/// orders at placement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Address {
    pub city: String,
    pub locality: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
}

/// A phone number split into ISD code and local number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhoneNumber {
    pub isd_code: String,
    pub number: String,
}

/// A user account.
///
/// The password hash never leaves the repository layer; this struct is safe
/// to serialize into responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<PhoneNumber>,
    pub address: Option<Address>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_rejects_unknown_fields() {
        let err = serde_json::from_str::<UpdateProfileInput>(r#"{"firstName":"A","isAdmin":true}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_update_profile_partial() {
        let input: UpdateProfileInput =
            serde_json::from_str(r#"{"firstName":"Asha"}"#).unwrap();
        assert_eq!(input.first_name.as_deref(), Some("Asha"));
        assert!(input.email.is_none());
        assert!(input.address.is_none());
    }

    #[test]
    fn test_phone_number_wire_format() {
        let phone: PhoneNumber =
            serde_json::from_str(r#"{"isdCode":"+91","number":"9876543210"}"#).unwrap();
        assert_eq!(phone.isd_code, "+91");
    }
}
