//! Product API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use rare_thread_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{product_id}",
            get(get_product).put(update_product),
        )
}

/// List every product with images and sizes, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.pool());
    let products = repo.list_all().await?;
    Ok(Json(products))
}

/// Get a single product.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Product>> {
    let repo = ProductRepository::new(state.pool());
    repo.get_by_id(&product_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}

/// Create a product, then return it in the same shape as a get.
///
/// # Errors
///
/// Returns 409 if the product id already exists.
async fn create_product(
    State(state): State<AppState>,
    Json(new_product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let repo = ProductRepository::new(state.pool());
    repo.create(&new_product).await?;

    // Re-read so the response carries the aggregated image and size lists
    let product = repo
        .get_by_id(&new_product.id)
        .await?
        .ok_or_else(|| AppError::Internal("created product missing on re-read".to_owned()))?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to a product.
///
/// An update that carries no updatable field is reported as 404, matching
/// the nothing-to-update contract.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let repo = ProductRepository::new(state.pool());
    let updated = repo.update(&product_id, &patch).await?;
    if !updated {
        return Err(AppError::NotFound(format!("product {product_id}")));
    }

    repo.get_by_id(&product_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}
