//! Admin order management handlers.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use clover_core::{OrderId, OrderStatus};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::auth::RequireAdmin;
use crate::models::order::UpdateOrderInput;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderDetailsRequest {
    pub order_id: OrderId,
}

/// Fulfillment update request. Everything except `orderId` is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOrderRequest {
    pub order_id: OrderId,
    pub status: Option<OrderStatus>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub tracking_number: Option<String>,
    pub delivery_contact: Option<String>,
    pub invoice_url: Option<String>,
    pub invoice_file: Option<String>,
    pub invoice_notes: Option<String>,
}

impl UpdateOrderRequest {
    fn into_input(self) -> UpdateOrderInput {
        UpdateOrderInput {
            status: self.status,
            estimated_delivery: self.estimated_delivery,
            tracking_number: self.tracking_number,
            delivery_contact: self.delivery_contact,
            invoice_url: self.invoice_url,
            invoice_file: self.invoice_file,
            invoice_notes: self.invoice_notes,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /admin/order/showAllOrders`
pub async fn show_all(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Value>> {
    let orders = OrderRepository::new(state.pool())
        .list_all_with_customer()
        .await?;

    Ok(Json(json!({
        "success": true,
        "orders": orders,
    })))
}

/// `POST /admin/order/orderDetails`
pub async fn details(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<OrderDetailsRequest>,
) -> Result<Json<Value>> {
    let order = OrderRepository::new(state.pool())
        .get_with_customer(body.order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "order": order,
    })))
}

/// `POST /admin/order/updateOrder`
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<Value>> {
    let order_id = body.order_id;
    let input = body.into_input();
    input.validate().map_err(AppError::Validation)?;

    if input.is_empty() {
        return Err(AppError::Validation(
            "nothing to update".to_string(),
        ));
    }

    let order = OrderRepository::new(state.pool())
        .update_fulfillment(order_id, &input)
        .await?;

    tracing::info!(order = %order.reference, "Order updated");

    Ok(Json(json!({
        "success": true,
        "message": "Order updated",
        "order": order,
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_order_request_parses() {
        let body: UpdateOrderRequest = serde_json::from_str(
            r#"{"orderId":12,"status":"shipped","trackingNumber":"TRK-9"}"#,
        )
        .unwrap();
        assert_eq!(body.order_id, OrderId::new(12));
        assert_eq!(body.status, Some(OrderStatus::Shipped));

        let input = body.into_input();
        assert!(!input.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_order_request_rejects_unknown_fields() {
        let json = r#"{"orderId":12,"totalAmount":"0"}"#;
        assert!(serde_json::from_str::<UpdateOrderRequest>(json).is_err());
    }
}
