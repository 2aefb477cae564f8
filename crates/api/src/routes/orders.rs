//! Order API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;

use rare_thread_core::{OrderId, UserId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::{NewOrder, Order};
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/user/{user_id}", get(list_user_orders))
        .route("/api/orders/{order_id}", get(get_order))
        .route("/api/orders/{order_id}/status", patch(update_order_status))
}

/// Request for updating an order's status.
#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: String,
}

/// Place an order.
///
/// The order header and all line items commit atomically; a failed item
/// insert rolls the whole order back.
///
/// # Errors
///
/// Returns an error if any statement fails.
async fn create_order(
    State(state): State<AppState>,
    Json(new_order): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    let repo = OrderRepository::new(state.pool());
    let order = repo.create(&new_order).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get a single order with its items.
///
/// # Errors
///
/// Returns 404 if the order does not exist.
async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    repo.get_by_id(order_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))
}

/// List a user's orders, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.get_by_user(user_id).await?;
    Ok(Json(orders))
}

/// Set an order's status.
///
/// Any status string is accepted; the values are a convention between the
/// storefront and the fulfillment flow.
///
/// # Errors
///
/// Returns 404 if the order does not exist.
async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    repo.update_status(order_id, &body.status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))
}
