//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rare_thread_core::ProductId;

/// A catalog product with its aggregated images and sizes.
///
/// `image` is ordered by display order; `sizes` has set semantics (distinct,
/// no guaranteed order). Both are always present, empty when the product has
/// none.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Mirror of `id`; the frontend still reads `_id`.
    #[serde(rename = "_id")]
    pub legacy_id: ProductId,
    /// Product name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Category label (e.g. "Hoodies").
    pub category: String,
    /// Whether the product is currently available.
    pub current: bool,
    /// Image URLs in display order.
    pub image: Vec<String>,
    /// Distinct available sizes.
    pub sizes: Vec<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Caller-supplied product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Category label.
    pub category: String,
    /// Availability flag, defaults to true.
    #[serde(default = "default_current")]
    pub current: bool,
    /// Image URLs; insertion order becomes display order.
    #[serde(default)]
    pub image: Vec<String>,
    /// Available sizes; duplicates collapse on insert.
    #[serde(default)]
    pub sizes: Vec<String>,
}

const fn default_current() -> bool {
    true
}

/// Partial update for a product's scalar fields.
///
/// This is the allow-list: `id`, `image`, and `sizes` are not representable
/// here, so a request body carrying them has those keys dropped during
/// deserialization rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New price.
    pub price: Option<Decimal>,
    /// New category.
    pub category: Option<String>,
    /// New availability flag.
    pub current: Option<bool>,
}

impl ProductPatch {
    /// True when no field is set, i.e. there is nothing to update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.current.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_product_defaults() {
        let product: NewProduct = serde_json::from_value(json!({
            "id": "0001",
            "name": "Tee",
            "price": 25,
            "category": "T-Shirts"
        }))
        .unwrap();

        assert!(product.current);
        assert!(product.description.is_none());
        assert!(product.image.is_empty());
        assert!(product.sizes.is_empty());
        assert_eq!(product.price, Decimal::from(25));
    }

    #[test]
    fn test_patch_drops_protected_fields() {
        // id, image, and sizes are not part of the patch allow-list; they
        // deserialize away silently instead of erroring.
        let patch: ProductPatch = serde_json::from_value(json!({
            "id": "0002",
            "image": ["/x.png"],
            "sizes": ["S"],
            "price": 65
        }))
        .unwrap();

        assert_eq!(patch.price, Some(Decimal::from(65)));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_of_only_protected_fields_is_empty() {
        let patch: ProductPatch = serde_json::from_value(json!({
            "id": "0002",
            "image": ["/x.png"],
            "sizes": ["S", "M"]
        }))
        .unwrap();

        assert!(patch.is_empty());
    }

    #[test]
    fn test_product_serializes_wire_shape() {
        let product = Product {
            id: ProductId::new("0001"),
            legacy_id: ProductId::new("0001"),
            name: "Tee".to_owned(),
            description: None,
            price: "25".parse().unwrap(),
            category: "T-Shirts".to_owned(),
            current: true,
            image: vec!["/a.png".to_owned()],
            sizes: vec!["S".to_owned(), "M".to_owned()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], json!("0001"));
        assert_eq!(value["_id"], json!("0001"));
        // rust_decimal's serde-float feature keeps prices as JSON numbers
        assert_eq!(value["price"], json!(25.0));
        assert_eq!(value["image"], json!(["/a.png"]));
        assert_eq!(value["sizes"], json!(["S", "M"]));
    }
}
