//! Order repository for database operations.
//!
//! An order and its line items are created atomically. Items are snapshots
//! of the product at order time (name, price, first image URL), so later
//! catalog edits never change order history.

use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;

use rare_thread_core::{OrderId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderItem, ShippingAddress};

const ORDER_SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ORDER_SUFFIX_LEN: usize = 9;

/// Generate a human-readable order number.
///
/// Format: `ORD-{millisecond timestamp}-{9 random uppercase alphanumerics}`,
/// e.g. `ORD-1702312345678-ABC123XYZ`. Collisions are treated as negligible;
/// there is no uniqueness check or retry here, only the column's unique
/// constraint as a backstop.
#[must_use]
pub fn generate_order_number() -> String {
    let timestamp = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..ORDER_SUFFIX_LEN)
        .map(|_| {
            let index = rng.random_range(0..ORDER_SUFFIX_CHARSET.len());
            char::from(ORDER_SUFFIX_CHARSET[index])
        })
        .collect();
    format!("ORD-{timestamp}-{suffix}")
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    order_number: String,
    subtotal: rust_decimal::Decimal,
    delivery_fee: rust_decimal::Decimal,
    total: rust_decimal::Decimal,
    status: String,
    shipping_street: String,
    shipping_city: String,
    shipping_state: String,
    shipping_zip: String,
    shipping_country: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            order_number: self.order_number,
            items,
            subtotal: self.subtotal,
            delivery_fee: self.delivery_fee,
            total: self.total,
            status: self.status,
            shipping_address: ShippingAddress {
                street: self.shipping_street,
                city: self.shipping_city,
                state: self.shipping_state,
                zip: self.shipping_zip,
                country: self.shipping_country,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    product_id: ProductId,
    product_name: String,
    product_price: rust_decimal::Decimal,
    quantity: i32,
    size: String,
    image_url: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_id: row.product_id,
            name: row.product_name,
            price: row.product_price,
            quantity: row.quantity,
            size: row.size,
            image: row.image_url.into_iter().collect(),
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, order_number, subtotal, delivery_fee, total, status, \
     shipping_street, shipping_city, shipping_state, shipping_zip, shipping_country, \
     created_at, updated_at";

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

    /// Create an order with its line items in one transaction.
    ///
    /// Generates the order number, inserts the header with the shipping
    /// address flattened, then inserts one snapshot row per item, capturing
    /// the first image URL (or none). Returns the fully assembled order,
    /// shaped exactly like [`Self::get_by_id`]'s result. If any item insert
    /// fails the transaction rolls back, so no order-without-items state is
    /// ever persisted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails (including
    /// a foreign-key violation for an unknown user).
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, RepositoryError> {
        let order_number = generate_order_number();
        let mut tx = self.pool.begin().await?;

        let header: OrderRow = sqlx::query_as(&format!(
            r"
            INSERT INTO orders (
                user_id, order_number, subtotal, delivery_fee, total, status,
                shipping_street, shipping_city, shipping_state, shipping_zip, shipping_country
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(new_order.user_id)
        .bind(&order_number)
        .bind(new_order.subtotal)
        .bind(new_order.delivery_fee)
        .bind(new_order.total)
        .bind(&new_order.status)
        .bind(&new_order.shipping_address.street)
        .bind(&new_order.shipping_address.city)
        .bind(&new_order.shipping_address.state)
        .bind(&new_order.shipping_address.zip)
        .bind(&new_order.shipping_address.country)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            let image_url = item.image.first();

            let row: OrderItemRow = sqlx::query_as(
                r"
                INSERT INTO order_items (
                    order_id, product_id, product_name, product_price, quantity, size, image_url
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING product_id, product_name, product_price, quantity, size, image_url
                ",
            )
            .bind(header.id)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .bind(&item.size)
            .bind(image_url)
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItem::from(row));
        }

        tx.commit().await?;

        Ok(header.into_order(items))
    }

    /// Get a single order with its items.
    ///
    /// Returns `Ok(None)` without querying items when the header is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let header: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let items = self.items_for(header.id).await?;
        Ok(Some(header.into_order(items)))
    }

    /// Get all of a user's orders, newest first, each with its items.
    ///
    /// One items query per order. Fine at this catalog's scale; batch it if
    /// order volume ever makes this the bottleneck.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let headers: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(headers.len());
        for header in headers {
            let items = self.items_for(header.id).await?;
            orders.push(header.into_order(items));
        }

        Ok(orders)
    }

    /// Set an order's status.
    ///
    /// Any string is accepted; the status values are a convention, not an
    /// enforced enumeration. Refreshes `updated_at`. Returns the updated
    /// order with items, or `Ok(None)` if no order matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let header: Option<OrderRow> = sqlx::query_as(&format!(
            r"
            UPDATE orders
            SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let items = self.items_for(header.id).await?;
        Ok(Some(header.into_order(items)))
    }

    /// Fetch an order's items in insertion order.
    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT product_id, product_name, product_price, quantity, size, image_url
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        let mut parts = number.splitn(3, '-');

        assert_eq!(parts.next(), Some("ORD"));

        let timestamp = parts.next().unwrap();
        assert!(!timestamp.is_empty());
        assert!(timestamp.bytes().all(|b| b.is_ascii_digit()));

        let suffix = parts.next().unwrap();
        assert_eq!(suffix.len(), ORDER_SUFFIX_LEN);
        assert!(
            suffix
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        );
    }

    #[test]
    fn test_order_numbers_vary() {
        // The random suffix makes consecutive numbers differ even within
        // one millisecond.
        let a = generate_order_number();
        let b = generate_order_number();
        assert_ne!(a, b);
    }
}
