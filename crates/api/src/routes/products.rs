//! Public catalog and rating route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use clover_core::ProductId;

use crate::db::products::ProductRepository;
use crate::db::ratings::RatingRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::auth::RequireUser;
use crate::models::rating::{validate_review, validate_score};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryQuery {
    pub category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RateProductRequest {
    pub product_id: ProductId,
    pub rating: i16,
    pub review: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShowRatingRequest {
    pub product_id: ProductId,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /product/showAllProducts`
pub async fn show_all(State(state): State<AppState>) -> Result<Json<Value>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(Json(json!({
        "success": true,
        "products": products,
    })))
}

/// `GET /product/productDetails/{id}`
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "product": product,
    })))
}

/// `GET /product/categoryProducts?category=`
///
/// Despite the name, matches category, name or brand (case-insensitive
/// substring), which is what the storefront search box sends here.
pub async fn by_category(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Value>> {
    if query.category.trim().is_empty() {
        return Err(AppError::Validation("category must not be empty".to_string()));
    }

    let products = ProductRepository::new(state.pool())
        .search(&query.category)
        .await?;

    Ok(Json(json!({
        "success": true,
        "products": products,
    })))
}

/// `POST /product/rateProduct`
pub async fn rate(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<RateProductRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    validate_score(body.rating).map_err(AppError::Validation)?;
    validate_review(body.review.as_deref()).map_err(AppError::Validation)?;

    let rating = RatingRepository::new(state.pool())
        .create(body.product_id, current.id, body.rating, body.review.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Rating submitted",
            "rating": rating,
        })),
    ))
}

/// `PATCH /product/editRating`
pub async fn edit_rating(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<RateProductRequest>,
) -> Result<Json<Value>> {
    validate_score(body.rating).map_err(AppError::Validation)?;
    validate_review(body.review.as_deref()).map_err(AppError::Validation)?;

    let rating = RatingRepository::new(state.pool())
        .update_for_user(body.product_id, current.id, body.rating, body.review.as_deref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Rating updated",
        "rating": rating,
    })))
}

/// `POST /product/showRating`
pub async fn show_ratings(
    State(state): State<AppState>,
    Json(body): Json<ShowRatingRequest>,
) -> Result<Json<Value>> {
    let ratings = RatingRepository::new(state.pool())
        .list_for_product(body.product_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "ratings": ratings,
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_request_parses() {
        let body: RateProductRequest =
            serde_json::from_str(r#"{"productId":3,"rating":4,"review":"solid"}"#).unwrap();
        assert_eq!(body.rating, 4);
        assert_eq!(body.product_id, ProductId::new(3));
    }

    #[test]
    fn test_rate_request_rejects_unknown_fields() {
        let json = r#"{"productId":3,"rating":4,"userId":1}"#;
        assert!(serde_json::from_str::<RateProductRequest>(json).is_err());
    }
}
