//! Database operations for the catalog `PostgreSQL`.
//!
//! ## Tables
//!
//! - `products`, `product_images`, `product_sizes` - catalog with aggregated
//!   image and size lists
//! - `users`, `user_addresses` - accounts with dual-key lookup and the
//!   single-default address invariant
//! - `orders`, `order_items` - orders with denormalized line-item snapshots
//!
//! ## Conventions
//!
//! Every logical operation runs on one pooled connection. Multi-statement
//! operations (product create, order create, add address) run inside one
//! `sqlx` transaction: commit on the success path, and any early return
//! drops the transaction, which rolls back and releases the connection.
//! Lookup absence is `Ok(None)`, never an error.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p rare-thread-cli -- migrate
//! ```

pub mod orders;
pub mod products;
pub mod users;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx. Pool exhaustion and unreachable-store
    /// failures surface here too.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found, where absence is an error rather
    /// than a lookup miss.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g. duplicate product id or email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool.
///
/// The pool is constructed once at startup, owned by the application state,
/// and borrowed by each repository. Its size bounds
/// request concurrency: when all connections are busy, acquisition blocks
/// until one is released or the acquire timeout elapses.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `min_connections` / `max_connections` - pool bounds
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    min_connections: u32,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(min_connections)
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
