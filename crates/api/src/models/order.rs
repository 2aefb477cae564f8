//! Order domain types.
//!
//! Order items are snapshots: the name, price, and image captured here are
//! the values at order time, never re-read from the catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rare_thread_core::{OrderId, ProductId, UserId};

use super::user::default_country;

/// An order with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Buyer's user ID.
    pub user_id: UserId,
    /// Human-readable order number (e.g. `ORD-1702312345678-ABC123XYZ`).
    pub order_number: String,
    /// Line items.
    pub items: Vec<OrderItem>,
    /// Item subtotal before delivery.
    pub subtotal: Decimal,
    /// Delivery fee.
    pub delivery_fee: Decimal,
    /// Grand total.
    pub total: Decimal,
    /// Status string. By convention one of pending, processing, shipped,
    /// delivered, cancelled; not enforced.
    pub status: String,
    /// Where the order ships.
    pub shipping_address: ShippingAddress,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A line item, used both as order input and in responses.
///
/// On input `image` carries the product's image list and only the first URL
/// is stored; on output it carries zero or one stored URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Catalog product reference (not required to still exist).
    pub product_id: ProductId,
    /// Product name at order time.
    pub name: String,
    /// Unit price at order time.
    pub price: Decimal,
    /// Quantity ordered.
    pub quantity: i32,
    /// Chosen size.
    pub size: String,
    /// Image URLs.
    #[serde(default)]
    pub image: Vec<String>,
}

/// Shipping address, stored flat on the order row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// ZIP or postal code.
    pub zip: String,
    /// Country, defaults to "USA".
    #[serde(default = "default_country")]
    pub country: String,
}

/// Input for placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    /// Buyer's user ID.
    pub user_id: UserId,
    /// Items being ordered.
    pub items: Vec<OrderItem>,
    /// Item subtotal before delivery.
    pub subtotal: Decimal,
    /// Delivery fee, defaults to 10.0.
    #[serde(default = "default_delivery_fee")]
    pub delivery_fee: Decimal,
    /// Grand total.
    pub total: Decimal,
    /// Shipping address.
    pub shipping_address: ShippingAddress,
    /// Initial status, defaults to "pending".
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_delivery_fee() -> Decimal {
    Decimal::new(100, 1)
}

fn default_status() -> String {
    "pending".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_body() -> serde_json::Value {
        json!({
            "user_id": uuid::Uuid::new_v4(),
            "items": [{
                "product_id": "0001",
                "name": "Tee",
                "price": 25,
                "quantity": 2,
                "size": "M",
                "image": ["/a.png", "/b.png"]
            }],
            "subtotal": 50,
            "total": 60,
            "shipping_address": {
                "street": "1 Main St",
                "city": "Austin",
                "state": "TX",
                "zip": "78701"
            }
        })
    }

    #[test]
    fn test_new_order_defaults() {
        let order: NewOrder = serde_json::from_value(order_body()).unwrap();

        assert_eq!(order.delivery_fee, Decimal::new(100, 1));
        assert_eq!(order.status, "pending");
        assert_eq!(order.shipping_address.country, "USA");
    }

    #[test]
    fn test_order_item_image_defaults_to_empty() {
        let item: OrderItem = serde_json::from_value(json!({
            "product_id": "0001",
            "name": "Tee",
            "price": 25,
            "quantity": 1,
            "size": "S"
        }))
        .unwrap();

        assert!(item.image.is_empty());
    }

    #[test]
    fn test_new_order_requires_totals() {
        let mut body = order_body();
        body.as_object_mut().unwrap().remove("total");
        assert!(serde_json::from_value::<NewOrder>(body).is_err());
    }
}
