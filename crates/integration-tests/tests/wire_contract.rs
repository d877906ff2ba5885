//! Contracts between API clients and the shared core types.
//!
//! These run without a server. They pin down the JSON shapes that the web
//! and admin frontends depend on, so a core type change that would break a
//! client fails here first.

#![allow(clippy::unwrap_used)]

use clover_core::{OrderStatus, PaymentMethod, ProductId, Role, UserId};
use serde_json::json;

// =============================================================================
// IDs
// =============================================================================

#[test]
fn test_ids_serialize_as_bare_numbers() {
    // Clients send `{"productId": 5}`, not `{"productId": {"0": 5}}`.
    let body = json!({ "productId": ProductId::new(5) });
    assert_eq!(body.to_string(), r#"{"productId":5}"#);

    let id: UserId = serde_json::from_value(json!(12)).unwrap();
    assert_eq!(id.as_i32(), 12);
}

#[test]
fn test_ids_reject_non_numbers() {
    assert!(serde_json::from_value::<ProductId>(json!("5")).is_err());
    assert!(serde_json::from_value::<ProductId>(json!(null)).is_err());
}

// =============================================================================
// Statuses
// =============================================================================

#[test]
fn test_order_status_wire_values_are_lowercase() {
    for (status, wire) in [
        (OrderStatus::Pending, "pending"),
        (OrderStatus::Processed, "processed"),
        (OrderStatus::Shipped, "shipped"),
        (OrderStatus::Delivered, "delivered"),
        (OrderStatus::Cancelled, "cancelled"),
    ] {
        assert_eq!(serde_json::to_value(status).unwrap(), json!(wire));
    }
}

#[test]
fn test_admin_dashboard_status_dropdown_values() {
    // The admin order form submits these exact strings.
    for wire in ["pending", "processed", "shipped", "delivered", "cancelled"] {
        assert!(serde_json::from_value::<OrderStatus>(json!(wire)).is_ok());
    }
    // Legacy capitalized values must not sneak back in.
    assert!(serde_json::from_value::<OrderStatus>(json!("Cancelled")).is_err());
}

#[test]
fn test_checkout_payment_methods() {
    assert_eq!(
        serde_json::from_value::<PaymentMethod>(json!("cod")).unwrap(),
        PaymentMethod::Cod
    );
    assert_eq!(
        serde_json::from_value::<PaymentMethod>(json!("online")).unwrap(),
        PaymentMethod::Online
    );
    // The checkout page has no card option; the API must not invent one.
    assert!(serde_json::from_value::<PaymentMethod>(json!("card")).is_err());
}

#[test]
fn test_role_wire_values() {
    assert_eq!(serde_json::to_value(Role::User).unwrap(), json!("user"));
    assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("admin"));
    assert!(serde_json::from_value::<Role>(json!("superadmin")).is_err());
}
