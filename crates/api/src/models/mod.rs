//! Domain types for the catalog API.
//!
//! These are the JSON-facing shapes: responses mirror what the storefront
//! frontend already consumes, and request types double as the allow-list
//! for what callers may set. Database row types live in the `db` modules.

pub mod order;
pub mod product;
pub mod user;

pub use order::{NewOrder, Order, OrderItem, ShippingAddress};
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{Address, NewAddress, NewUser, User, UserPatch};
