//! HTTP route handlers.
//!
//! Each entity module exposes a `router()` that the main binary merges.
//! Handlers stay thin: parse and validate at the boundary, call into the
//! `db` layer, map absence to 404.

pub mod orders;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the combined API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(users::router())
        .merge(orders::router())
}
