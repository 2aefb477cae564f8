//! Catalog seeding command.
//!
//! Reads a YAML list of products and inserts each through the product data
//! access. A product id that already exists is reported and skipped, so the
//! command can be re-run safely.

use std::path::Path;

use rare_thread_api::db::{self, ProductRepository, RepositoryError};
use rare_thread_api::models::NewProduct;

use super::CliError;

/// Seed the catalog from a YAML product file.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed, or if an insert
/// fails for a reason other than the product already existing.
pub async fn run(file: &Path) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(file)?;
    let products: Vec<NewProduct> = serde_yaml::from_str(&raw)?;
    tracing::info!(count = products.len(), file = %file.display(), "Loaded seed file");

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url, 1, 5).await?;
    let repo = ProductRepository::new(&pool);

    let mut created = 0usize;
    let mut skipped = 0usize;
    for product in &products {
        match repo.create(product).await {
            Ok(()) => {
                tracing::info!(id = %product.id, name = %product.name, "Seeded product");
                created += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                // Already present from an earlier run
                tracing::warn!(id = %product.id, "Product already exists, skipping");
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(created, skipped, "Seed complete");
    Ok(())
}
