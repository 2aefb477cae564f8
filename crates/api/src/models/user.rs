//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rare_thread_core::{AddressId, Email, UserId};

/// A user with their saved addresses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Surrogate user ID.
    pub id: UserId,
    /// Identity provider's user id, when the account came from Cognito.
    pub cognito_user_id: Option<String>,
    /// Email address.
    pub email: Email,
    /// Full name.
    pub name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Saved addresses, default first, then oldest first.
    pub addresses: Vec<Address>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A saved shipping address.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    /// Address ID.
    pub id: AddressId,
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// ZIP or postal code.
    pub zip: String,
    /// Country.
    pub country: String,
    /// Whether this is the user's default address. The frontend reads
    /// camelCase here.
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

/// Input for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Email address (required, validated on deserialization).
    pub email: Email,
    /// Identity provider's user id.
    #[serde(default)]
    pub cognito_user_id: Option<String>,
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Partial update for a user's scalar fields.
///
/// Addresses have their own sub-resource endpoint; an `addresses` key in an
/// update body is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    /// New external identity id.
    pub cognito_user_id: Option<String>,
    /// New email address.
    pub email: Option<Email>,
    /// New name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
}

impl UserPatch {
    /// True when no field is set, i.e. there is nothing to update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cognito_user_id.is_none()
            && self.email.is_none()
            && self.name.is_none()
            && self.phone.is_none()
    }
}

/// Input for adding an address to a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
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
    /// Whether to make this the default address. Accepts either spelling
    /// the frontend has used over time.
    #[serde(default, rename = "isDefault", alias = "is_default")]
    pub is_default: bool,
}

pub(crate) fn default_country() -> String {
    "USA".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_serializes_camel_case_default_flag() {
        let address = Address {
            id: AddressId::generate(),
            street: "1 Main St".to_owned(),
            city: "Austin".to_owned(),
            state: "TX".to_owned(),
            zip: "78701".to_owned(),
            country: "USA".to_owned(),
            is_default: true,
        };

        let value = serde_json::to_value(&address).unwrap();
        assert_eq!(value["isDefault"], json!(true));
        assert!(value.get("is_default").is_none());
    }

    #[test]
    fn test_new_address_defaults() {
        let address: NewAddress = serde_json::from_value(json!({
            "street": "1 Main St",
            "city": "Austin",
            "state": "TX",
            "zip": "78701"
        }))
        .unwrap();

        assert_eq!(address.country, "USA");
        assert!(!address.is_default);
    }

    #[test]
    fn test_new_address_accepts_both_default_spellings() {
        let camel: NewAddress = serde_json::from_value(json!({
            "street": "1 Main St", "city": "A", "state": "B", "zip": "C",
            "isDefault": true
        }))
        .unwrap();
        let snake: NewAddress = serde_json::from_value(json!({
            "street": "1 Main St", "city": "A", "state": "B", "zip": "C",
            "is_default": true
        }))
        .unwrap();

        assert!(camel.is_default);
        assert!(snake.is_default);
    }

    #[test]
    fn test_user_patch_drops_addresses_key() {
        let patch: UserPatch = serde_json::from_value(json!({
            "name": "Dana",
            "addresses": [{"street": "nope"}]
        }))
        .unwrap();

        assert_eq!(patch.name.as_deref(), Some("Dana"));
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_user_patch_of_only_addresses_is_empty() {
        let patch: UserPatch = serde_json::from_value(json!({
            "addresses": []
        }))
        .unwrap();

        assert!(patch.is_empty());
    }

    #[test]
    fn test_new_user_requires_email() {
        let result = serde_json::from_value::<NewUser>(json!({"name": "Dana"}));
        assert!(result.is_err());
    }
}
