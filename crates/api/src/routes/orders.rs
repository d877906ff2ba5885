//! Order route handlers for customers.

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use clover_core::{OrderId, PaymentMethod, ProductId};

use crate::db::orders::OrderRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::auth::RequireUser;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderDetailsRequest {
    pub order_id: OrderId,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /order/placeOrder`
///
/// Places the order in one transaction; any unavailable line item fails the
/// whole order and leaves stock untouched.
pub async fn place(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    if body.items.is_empty() {
        return Err(AppError::Validation("order has no items".to_string()));
    }
    if body.items.iter().any(|line| line.quantity < 1) {
        return Err(AppError::Validation(
            "item quantity must be at least 1".to_string(),
        ));
    }
    if body.payment_method == PaymentMethod::Online && body.transaction_id.is_none() {
        return Err(AppError::Validation(
            "online payment requires a transaction id".to_string(),
        ));
    }

    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))?;

    let Some(address) = user.address else {
        return Err(AppError::Validation(
            "a shipping address is required before placing an order".to_string(),
        ));
    };

    let items: Vec<(ProductId, i32)> = body
        .items
        .iter()
        .map(|line| (line.product_id, line.quantity))
        .collect();

    let order = OrderRepository::new(state.pool())
        .place(
            current.id,
            &address,
            body.payment_method,
            body.transaction_id.as_deref(),
            &items,
        )
        .await?;

    tracing::info!(order = %order.reference, user_id = %current.id, "Order placed");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Order placed",
            "order": order,
        })),
    ))
}

/// `POST /order/orderDetails`
pub async fn details(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<OrderDetailsRequest>,
) -> Result<Json<Value>> {
    let order = OrderRepository::new(state.pool())
        .get_for_user(body.order_id, current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "order": order,
    })))
}

/// `GET /order/showOrder`
pub async fn history(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(current.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "orders": orders,
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_place_order_request_parses() {
        let body: PlaceOrderRequest = serde_json::from_str(
            r#"{"items":[{"productId":1,"quantity":2}],"paymentMethod":"cod"}"#,
        )
        .unwrap();
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.payment_method, PaymentMethod::Cod);
        assert!(body.transaction_id.is_none());
    }

    #[test]
    fn test_place_order_rejects_unknown_payment_method() {
        let json = r#"{"items":[{"productId":1,"quantity":2}],"paymentMethod":"card"}"#;
        assert!(serde_json::from_str::<PlaceOrderRequest>(json).is_err());
    }
}
