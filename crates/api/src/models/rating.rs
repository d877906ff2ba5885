//! Product rating models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clover_core::{ProductId, RatingId, UserId};

/// Maximum review length in characters (also enforced by a DB check).
pub const MAX_REVIEW_LENGTH: usize = 500;

/// A single user's rating of a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RatingId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rating joined with its author's public profile, for product pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingWithAuthor {
    #[serde(flatten)]
    pub rating: Rating,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Validate a 1-5 star score.
///
/// # Errors
///
/// Returns a message suitable for a 400 response.
pub fn validate_score(rating: i16) -> Result<(), String> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err("Rating must be a number between 1 and 5".to_string())
    }
}

/// Validate an optional review body.
///
/// # Errors
///
/// Returns a message suitable for a 400 response.
pub fn validate_review(review: Option<&str>) -> Result<(), String> {
    match review {
        Some(text) if text.chars().count() > MAX_REVIEW_LENGTH => Err(format!(
            "Review must be at most {MAX_REVIEW_LENGTH} characters"
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_score_bounds() {
        assert!(validate_score(1).is_ok());
        assert!(validate_score(5).is_ok());
        assert!(validate_score(0).is_err());
        assert!(validate_score(6).is_err());
        assert!(validate_score(-3).is_err());
    }

    #[test]
    fn test_validate_review_length() {
        assert!(validate_review(None).is_ok());
        assert!(validate_review(Some("great mug")).is_ok());
        let long = "x".repeat(MAX_REVIEW_LENGTH + 1);
        assert!(validate_review(Some(&long)).is_err());
    }
}
