//! Order models.
//!
//! Orders are snapshots: line prices and the shipping address are captured
//! at placement time and never recomputed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clover_core::{Email, OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::user::Address;

/// One line item within an order. `price` is the unit price at order time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    /// Current catalog name, if the product still exists. Line items keep a
    /// weak reference, so this is `None` for deleted products.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Human-readable order identifier, e.g. `ORD-1722470400000-9f3a`.
    pub reference: String,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order with customer identity attached, for admin listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithCustomer {
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: String,
    pub customer_email: Email,
}

/// Admin fulfillment update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOrderInput {
    pub status: Option<OrderStatus>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub tracking_number: Option<String>,
    pub delivery_contact: Option<String>,
    pub invoice_url: Option<String>,
    pub invoice_file: Option<String>,
    pub invoice_notes: Option<String>,
}

impl UpdateOrderInput {
    /// Validate field-level constraints.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(contact) = &self.delivery_contact
            && (contact.len() != 10 || !contact.chars().all(|c| c.is_ascii_digit()))
        {
            return Err("delivery contact must be a 10-digit number".to_string());
        }
        Ok(())
    }

    /// Whether the update carries any change at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.estimated_delivery.is_none()
            && self.tracking_number.is_none()
            && self.delivery_contact.is_none()
            && self.invoice_url.is_none()
            && self.invoice_file.is_none()
            && self.invoice_notes.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_order_status_parses_lowercase_only() {
        let input: UpdateOrderInput = serde_json::from_str(r#"{"status":"shipped"}"#).unwrap();
        assert_eq!(input.status, Some(OrderStatus::Shipped));

        assert!(serde_json::from_str::<UpdateOrderInput>(r#"{"status":"Shipped"}"#).is_err());
    }

    #[test]
    fn test_update_order_delivery_contact_validation() {
        let ok = UpdateOrderInput {
            delivery_contact: Some("9876543210".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateOrderInput {
            delivery_contact: Some("12345".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let non_numeric = UpdateOrderInput {
            delivery_contact: Some("98765abcde".to_string()),
            ..Default::default()
        };
        assert!(non_numeric.validate().is_err());
    }

    #[test]
    fn test_update_order_is_empty() {
        assert!(UpdateOrderInput::default().is_empty());
        let input = UpdateOrderInput {
            tracking_number: Some("TRK123".to_string()),
            ..Default::default()
        };
        assert!(!input.is_empty());
    }
}
