//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clover_core::ProductId;

/// A catalog entry.
///
/// `avg_rating` and `total_ratings` are denormalized aggregates over the
/// ratings table, maintained atomically whenever a rating is created or
/// edited.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub short_description: String,
    pub long_description: String,
    pub stock: i32,
    pub category: String,
    pub cover_image: String,
    pub other_images: Vec<String>,
    pub avg_rating: Decimal,
    pub total_ratings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product (admin only). All fields required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProductInput {
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub short_description: String,
    pub long_description: String,
    pub stock: i32,
    pub category: String,
    pub cover_image: String,
    pub other_images: Vec<String>,
}

impl CreateProductInput {
    /// Validate field-level constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name is required".to_string());
        }
        if self.brand.trim().is_empty() {
            return Err("brand name is required".to_string());
        }
        if self.price < Decimal::ZERO {
            return Err("price must not be negative".to_string());
        }
        if self.stock < 0 {
            return Err("stock must not be negative".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("category is required".to_string());
        }
        if self.cover_image.trim().is_empty() {
            return Err("cover image is required".to_string());
        }
        if self.other_images.is_empty() {
            return Err("at least one additional image is required".to_string());
        }
        Ok(())
    }
}

/// Partial product update (admin only). `None` fields are left untouched.
///
/// Rating aggregates are not editable through this path; they only move
/// with the ratings table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<Decimal>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub cover_image: Option<String>,
    pub other_images: Option<Vec<String>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_input() -> CreateProductInput {
        CreateProductInput {
            name: "Ceramic Mug".to_string(),
            brand: "Kiln & Co".to_string(),
            price: Decimal::new(24_99, 2),
            short_description: "A mug".to_string(),
            long_description: "A very nice mug".to_string(),
            stock: 10,
            category: "kitchen".to_string(),
            cover_image: "https://cdn.example/mug.jpg".to_string(),
            other_images: vec!["https://cdn.example/mug2.jpg".to_string()],
        }
    }

    #[test]
    fn test_create_product_valid() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_create_product_requires_images() {
        let mut input = valid_input();
        input.other_images.clear();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_product_rejects_negative_stock() {
        let mut input = valid_input();
        input.stock = -1;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_product_rejects_unknown_fields() {
        let json = r#"{"name":"x","brand":"y","price":"1.00","shortDescription":"s",
            "longDescription":"l","stock":1,"category":"c","coverImage":"i",
            "otherImages":["j"],"avgRating":"5.0"}"#;
        assert!(serde_json::from_str::<CreateProductInput>(json).is_err());
    }
}
