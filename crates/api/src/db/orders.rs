//! Order repository.
//!
//! Placement is one transaction: every line item's stock decrement is an
//! atomic conditional UPDATE, and any failure rolls the whole order back so
//! no partial decrements survive. Prices and the shipping address are
//! snapshotted onto the order at placement time.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;

use clover_core::{Email, OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, OrderWithCustomer, UpdateOrderInput};
use crate::models::user::Address;
use crate::services::pricing;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    reference: String,
    user_id: i32,
    total_amount: Decimal,
    ship_city: String,
    ship_locality: String,
    ship_state: String,
    ship_country: String,
    ship_pincode: String,
    payment_method: String,
    transaction_id: Option<String>,
    status: String,
    tracking_id: Option<String>,
    delivery_contact: Option<String>,
    invoice_url: Option<String>,
    invoice_file_name: Option<String>,
    invoice_notes: Option<String>,
    expected_delivery_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let payment_method: PaymentMethod = self
            .payment_method
            .parse()
            .map_err(RepositoryError::DataCorruption)?;
        let status: OrderStatus = self.status.parse().map_err(RepositoryError::DataCorruption)?;

        Ok(Order {
            id: OrderId::new(self.id),
            reference: self.reference,
            user_id: UserId::new(self.user_id),
            items,
            total_amount: self.total_amount,
            shipping_address: Address {
                city: self.ship_city,
                locality: self.ship_locality,
                state: self.ship_state,
                country: self.ship_country,
                pincode: self.ship_pincode,
            },
            payment_method,
            transaction_id: self.transaction_id,
            status,
            tracking_id: self.tracking_id,
            delivery_contact: self.delivery_contact,
            invoice_url: self.invoice_url,
            invoice_file_name: self.invoice_file_name,
            invoice_notes: self.invoice_notes,
            expected_delivery_date: self.expected_delivery_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Internal row type for order line items, with the current catalog name
/// joined in (NULL when the product has since been deleted).
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
    product_name: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price: row.price,
            product_name: row.product_name,
        }
    }
}

/// Internal row type combining an order with its customer's identity.
#[derive(Debug, sqlx::FromRow)]
struct OrderWithCustomerRow {
    #[sqlx(flatten)]
    order: OrderRow,
    customer_first_name: String,
    customer_last_name: String,
    customer_email: String,
}

impl OrderWithCustomerRow {
    fn into_order_with_customer(
        self,
        items: Vec<OrderItem>,
    ) -> Result<OrderWithCustomer, RepositoryError> {
        let customer_email = Email::parse(&self.customer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let customer_name = format!("{} {}", self.customer_first_name, self.customer_last_name);

        Ok(OrderWithCustomer {
            order: self.order.into_order(items)?,
            customer_name,
            customer_email,
        })
    }
}

/// Row returned by the conditional stock decrement.
#[derive(Debug, sqlx::FromRow)]
struct DecrementRow {
    name: String,
    price: Decimal,
}

const ORDER_COLUMNS: &str = "id, reference, user_id, total_amount, \
     ship_city, ship_locality, ship_state, ship_country, ship_pincode, \
     payment_method, transaction_id, status, tracking_id, delivery_contact, \
     invoice_url, invoice_file_name, invoice_notes, expected_delivery_date, \
     created_at, updated_at";

const ITEM_COLUMNS: &str = "oi.order_id, oi.product_id, oi.quantity, oi.price, \
     p.name AS product_name";

/// How long after placement an order is expected to arrive.
const DELIVERY_WINDOW_DAYS: i64 = 7;

/// Generate a human-readable order reference, e.g. `ORD-1722470400000-9f3a`.
fn generate_reference() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u16 = rand::rng().random();
    format!("ORD-{millis}-{suffix:04x}")
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order for the given line items, all-or-nothing.
    ///
    /// For each line, stock is decremented with a conditional UPDATE that
    /// only matches when enough units remain; the returned catalog price is
    /// snapshotted onto the line. The caller validates the item list and
    /// payment fields before calling.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a product doesn't exist,
    /// `RepositoryError::InsufficientStock` naming the product if stock is
    /// short, and `RepositoryError::Database` for other failures. Every
    /// error path rolls back all decrements made so far.
    pub async fn place(
        &self,
        user_id: UserId,
        address: &Address,
        payment_method: PaymentMethod,
        transaction_id: Option<&str>,
        items: &[(ProductId, i32)],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut subtotal = Decimal::ZERO;
        let mut lines: Vec<OrderItem> = Vec::with_capacity(items.len());

        for &(product_id, quantity) in items {
            let decremented = sqlx::query_as::<_, DecrementRow>(
                "UPDATE products SET stock = stock - $2
                 WHERE id = $1 AND stock >= $2
                 RETURNING name, price",
            )
            .bind(product_id)
            .bind(quantity)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(row) = decremented else {
                // Distinguish a missing product from short stock; the
                // transaction drop rolls back earlier decrements either way.
                let name = sqlx::query_scalar::<_, String>(
                    "SELECT name FROM products WHERE id = $1",
                )
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;

                return Err(match name {
                    Some(name) => {
                        RepositoryError::InsufficientStock(format!(
                            "insufficient stock for {name}"
                        ))
                    }
                    None => RepositoryError::NotFound,
                });
            };

            subtotal += row.price * Decimal::from(quantity);
            lines.push(OrderItem {
                product_id,
                quantity,
                price: row.price,
                product_name: Some(row.name),
            });
        }

        let totals = pricing::order_totals(subtotal);
        let reference = generate_reference();
        let expected_delivery = Utc::now() + Duration::days(DELIVERY_WINDOW_DAYS);

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders
                 (reference, user_id, total_amount,
                  ship_city, ship_locality, ship_state, ship_country, ship_pincode,
                  payment_method, transaction_id, expected_delivery_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&reference)
        .bind(user_id)
        .bind(totals.total)
        .bind(&address.city)
        .bind(&address.locality)
        .bind(&address.state)
        .bind(&address.country)
        .bind(&address.pincode)
        .bind(payment_method.as_str())
        .bind(transaction_id)
        .bind(expected_delivery)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_row.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        order_row.into_order(lines)
    }

    /// Get one of the user's orders by ID. Other users' orders read as
    /// missing, not forbidden.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for_order(OrderId::new(row.id)).await?;
                Ok(Some(row.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// List every order with customer identity, newest first (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all_with_customer(
        &self,
    ) -> Result<Vec<OrderWithCustomer>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderWithCustomerRow>(&format!(
            "SELECT {ORDER_COLUMNS_QUALIFIED},
                    u.first_name AS customer_first_name,
                    u.last_name AS customer_last_name,
                    u.email AS customer_email
             FROM orders o
             JOIN users u ON u.id = o.user_id
             ORDER BY o.created_at DESC",
            ORDER_COLUMNS_QUALIFIED = qualified_order_columns()
        ))
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.order.id).collect();
        let mut items = self.items_for_orders(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.order.id).unwrap_or_default();
                row.into_order_with_customer(order_items)
            })
            .collect()
    }

    /// Get any order by ID with customer identity (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_with_customer(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithCustomer>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderWithCustomerRow>(&format!(
            "SELECT {ORDER_COLUMNS_QUALIFIED},
                    u.first_name AS customer_first_name,
                    u.last_name AS customer_last_name,
                    u.email AS customer_email
             FROM orders o
             JOIN users u ON u.id = o.user_id
             WHERE o.id = $1",
            ORDER_COLUMNS_QUALIFIED = qualified_order_columns()
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for_order(OrderId::new(row.order.id)).await?;
                Ok(Some(row.into_order_with_customer(items)?))
            }
            None => Ok(None),
        }
    }

    /// Apply an admin fulfillment update. `None` fields keep their value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_fulfillment(
        &self,
        id: OrderId,
        input: &UpdateOrderInput,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET
                 status = COALESCE($2, status),
                 expected_delivery_date = COALESCE($3, expected_delivery_date),
                 tracking_id = COALESCE($4, tracking_id),
                 delivery_contact = COALESCE($5, delivery_contact),
                 invoice_url = COALESCE($6, invoice_url),
                 invoice_file_name = COALESCE($7, invoice_file_name),
                 invoice_notes = COALESCE($8, invoice_notes)
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(input.status.map(OrderStatus::as_str))
        .bind(input.estimated_delivery)
        .bind(input.tracking_number.as_deref())
        .bind(input.delivery_contact.as_deref())
        .bind(input.invoice_url.as_deref())
        .bind(input.invoice_file.as_deref())
        .bind(input.invoice_notes.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let items = self.items_for_order(OrderId::new(row.id)).await?;
        row.into_order(items)
    }

    async fn items_for_order(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS}
             FROM order_items oi
             LEFT JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = $1
             ORDER BY oi.id ASC"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Fetch line items for a batch of orders, grouped by order ID.
    async fn items_for_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<std::collections::HashMap<i32, Vec<OrderItem>>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS}
             FROM order_items oi
             LEFT JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = ANY($1)
             ORDER BY oi.id ASC"
        ))
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: std::collections::HashMap<i32, Vec<OrderItem>> =
            std::collections::HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut items = self.items_for_orders(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect()
    }
}

/// The order column list prefixed with the `o.` alias for joined queries.
fn qualified_order_columns() -> String {
    ORDER_COLUMNS
        .split(", ")
        .map(|c| format!("o.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_reference_format() {
        let reference = generate_reference();
        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_qualified_order_columns() {
        let qualified = qualified_order_columns();
        assert!(qualified.starts_with("o.id, o.reference"));
        assert!(qualified.ends_with("o.updated_at"));
        assert!(!qualified.contains("o.o."));
    }
}
