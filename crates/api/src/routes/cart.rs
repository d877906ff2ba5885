//! Cart route handlers. All require a logged-in user.

use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use clover_core::ProductId;

use crate::db::carts::CartRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::auth::RequireUser;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CartItemRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateQuantityRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /cart/addItemToCart`
pub async fn add_item(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<CartItemRequest>,
) -> Result<Json<Value>> {
    CartRepository::new(state.pool())
        .add_item(current.id, body.product_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Item added to cart",
    })))
}

/// `POST /cart/deleteItemFromCart`
pub async fn delete_item(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<CartItemRequest>,
) -> Result<Json<Value>> {
    CartRepository::new(state.pool())
        .remove_item(current.id, body.product_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Item removed from cart",
    })))
}

/// `PUT /cart/updateQuantity`
///
/// The stored quantity is clamped to available stock; the response carries
/// what was actually stored. A product whose stock has run out since it was
/// added drops out of the cart and reports a quantity of 0.
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<Value>> {
    if body.quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    let stored = CartRepository::new(state.pool())
        .set_quantity(current.id, body.product_id, body.quantity)
        .await?;

    let message = if stored == 0 {
        "Product is out of stock, item removed from cart"
    } else {
        "Quantity updated"
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
        "quantity": stored,
    })))
}

/// `GET /cart/showCart`
pub async fn show(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>> {
    let cart = CartRepository::new(state.pool())
        .view_for_user(current.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "cart": cart,
    })))
}

/// `GET /cart/removeItemsAfterOrder`
///
/// Called by the client after a successful checkout. An already empty cart
/// reads as missing.
pub async fn clear_after_order(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>> {
    let removed = CartRepository::new(state.pool()).clear(current.id).await?;

    if removed == 0 {
        return Err(AppError::NotFound("Cart is already empty".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Cart cleared",
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_quantity_request_parses() {
        let body: UpdateQuantityRequest =
            serde_json::from_str(r#"{"productId":5,"quantity":2}"#).unwrap();
        assert_eq!(body.quantity, 2);
    }

    #[test]
    fn test_cart_item_request_rejects_unknown_fields() {
        assert!(serde_json::from_str::<CartItemRequest>(r#"{"productId":5,"price":"0"}"#).is_err());
    }
}
