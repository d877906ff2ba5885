//! Admin catalog management handlers.

use axum::{extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use clover_core::ProductId;

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::auth::RequireAdmin;
use crate::models::product::{CreateProductInput, UpdateProductInput};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Catalog update request. Everything except `productId` is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EditProductRequest {
    pub product_id: ProductId,
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

impl EditProductRequest {
    fn into_input(self) -> UpdateProductInput {
        UpdateProductInput {
            name: self.name,
            brand: self.brand,
            price: self.price,
            short_description: self.short_description,
            long_description: self.long_description,
            stock: self.stock,
            category: self.category,
            cover_image: self.cover_image,
            other_images: self.other_images,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteProductRequest {
    pub product_id: ProductId,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /admin/product/createProduct`
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Value>)> {
    body.validate().map_err(AppError::Validation)?;

    let product = ProductRepository::new(state.pool()).create(&body).await?;

    tracing::info!(product_id = %product.id, name = %product.name, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Product created",
            "product": product,
        })),
    ))
}

/// `POST /admin/product/editProduct`
pub async fn edit(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<EditProductRequest>,
) -> Result<Json<Value>> {
    let product_id = body.product_id;
    let input = body.into_input();

    if let Some(price) = input.price
        && price < Decimal::ZERO
    {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }
    if let Some(stock) = input.stock
        && stock < 0
    {
        return Err(AppError::Validation("stock must not be negative".to_string()));
    }

    let product = ProductRepository::new(state.pool())
        .update(product_id, &input)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Product updated",
        "product": product,
    })))
}

/// `POST /admin/product/deleteProduct`
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<DeleteProductRequest>,
) -> Result<Json<Value>> {
    ProductRepository::new(state.pool())
        .delete(body.product_id)
        .await?;

    tracing::info!(product_id = %body.product_id, "Product deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Product deleted",
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_product_request_partial() {
        let body: EditProductRequest =
            serde_json::from_str(r#"{"productId":7,"price":"19.99"}"#).unwrap();
        assert_eq!(body.product_id, ProductId::new(7));

        let input = body.into_input();
        assert_eq!(input.price, Some("19.99".parse().unwrap()));
        assert!(input.name.is_none());
    }

    #[test]
    fn test_edit_product_request_rejects_aggregates() {
        let json = r#"{"productId":7,"avgRating":"5.0"}"#;
        assert!(serde_json::from_str::<EditProductRequest>(json).is_err());
    }
}
