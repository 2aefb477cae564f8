//! Product repository for database operations.
//!
//! Products aggregate two child tables: `product_images` (ordered by
//! `display_order`) and `product_sizes` (distinct set). The read queries
//! fold both into text arrays with `COALESCE` so a product without children
//! still yields empty lists.

use sqlx::{PgPool, Postgres, QueryBuilder};

use rare_thread_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductPatch};

/// Row shape shared by the aggregate product queries.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: rust_decimal::Decimal,
    category: String,
    current: bool,
    image: Vec<String>,
    sizes: Vec<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            legacy_id: row.id.clone(),
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            current: row.current,
            image: row.image,
            sizes: row.sizes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get every product, newest first, with aggregated images and sizes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT p.id, p.name, p.description, p.price, p.category, p.current,
                   p.created_at, p.updated_at,
                   COALESCE(
                       (SELECT array_agg(pi.image_url ORDER BY pi.display_order)
                        FROM product_images pi
                        WHERE pi.product_id = p.id),
                       ARRAY[]::TEXT[]
                   ) AS image,
                   COALESCE(
                       (SELECT array_agg(DISTINCT ps.size)
                        FROM product_sizes ps
                        WHERE ps.product_id = p.id),
                       ARRAY[]::TEXT[]
                   ) AS sizes
            FROM products p
            ORDER BY p.created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a single product by ID with aggregated images and sizes.
    ///
    /// Returns `Ok(None)` if no product matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT p.id, p.name, p.description, p.price, p.category, p.current,
                   p.created_at, p.updated_at,
                   COALESCE(
                       (SELECT array_agg(pi.image_url ORDER BY pi.display_order)
                        FROM product_images pi
                        WHERE pi.product_id = p.id),
                       ARRAY[]::TEXT[]
                   ) AS image,
                   COALESCE(
                       (SELECT array_agg(DISTINCT ps.size)
                        FROM product_sizes ps
                        WHERE ps.product_id = p.id),
                       ARRAY[]::TEXT[]
                   ) AS sizes
            FROM products p
            WHERE p.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Create a product with its images and sizes in one transaction.
    ///
    /// Images get a 0-based `display_order` from their position in the input
    /// list. Size inserts use `ON CONFLICT DO NOTHING`, so a duplicate size
    /// in the input collapses silently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product id already exists.
    /// Returns `RepositoryError::Database` for other database errors; any
    /// failure rolls back the whole product.
    pub async fn create(&self, product: &NewProduct) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO products (id, name, description, price, category, current)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.current)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product id already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        for (index, image_url) in product.image.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO product_images (product_id, image_url, display_order)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(&product.id)
            .bind(image_url)
            .bind(i32::try_from(index).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        for size in &product.sizes {
            sqlx::query(
                r"
                INSERT INTO product_sizes (product_id, size)
                VALUES ($1, $2)
                ON CONFLICT (product_id, size) DO NOTHING
                ",
            )
            .bind(&product.id)
            .bind(size)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Apply a partial update to a product's scalar fields.
    ///
    /// Builds the `SET` clause from the patch's present fields plus an
    /// `updated_at` refresh. Returns `false` when the patch is empty
    /// (nothing to update, no SQL executed) or when no product matched the
    /// id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<bool, RepositoryError> {
        if patch.is_empty() {
            return Ok(false);
        }

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE products SET ");
        let mut fields = query.separated(", ");
        if let Some(name) = &patch.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(description) = &patch.description {
            fields
                .push("description = ")
                .push_bind_unseparated(description);
        }
        if let Some(price) = patch.price {
            fields.push("price = ").push_bind_unseparated(price);
        }
        if let Some(category) = &patch.category {
            fields.push("category = ").push_bind_unseparated(category);
        }
        if let Some(current) = patch.current {
            fields.push("current = ").push_bind_unseparated(current);
        }
        fields.push("updated_at = CURRENT_TIMESTAMP");
        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
