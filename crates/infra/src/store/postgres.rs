//! Postgres-backed product store.
//!
//! ## Error Mapping
//!
//! Every `sqlx::Error` becomes `StoreError::Backend` with the failing operation
//! name attached. Schema validation happens before any query is issued, so a
//! validation failure never touches the database.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::instrument;

use storefront_catalog::{Product, ProductDraft, ProductFields};
use storefront_core::ProductId;

use super::{ProductStore, StoreError, StoreResult};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    price       DOUBLE PRECISION NOT NULL CHECK (price >= 0),
    category    TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
)
"#;

/// Postgres-backed product store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; single-row writes
/// rely on Postgres row locking for concurrent updates to the same id.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and make sure the `products` table exists.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
        }
        other => StoreError::Backend(format!("{} failed: {}", operation, other)),
    }
}

fn row_to_product(row: &PgRow) -> StoreResult<Product> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_row", e);

    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let fields = ProductFields {
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        price: row.try_get("price").map_err(decode)?,
        category: row.try_get("category").map_err(decode)?,
    };
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(decode)?;

    Ok(Product::from_parts(
        ProductId::from_uuid(id),
        fields,
        created_at,
        updated_at,
    ))
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, draft))]
    async fn create(&self, draft: ProductDraft) -> StoreResult<Product> {
        let fields = draft.validate()?;
        let product = Product::new(ProductId::new(), fields, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.name())
        .bind(product.description())
        .bind(product.price())
        .bind(product.category())
        .bind(product.created_at())
        .bind(product.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        Ok(product)
    }

    #[instrument(skip(self, draft), fields(product_id = %id))]
    async fn update(&self, id: ProductId, draft: ProductDraft) -> StoreResult<Option<Product>> {
        let Some(mut product) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let fields = draft.validate()?;
        if !product.replace(fields, Utc::now()) {
            return Ok(Some(product));
        }

        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, category = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, name, description, price, category, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(product.name())
        .bind(product.description())
        .bind(product.price())
        .bind(product.category())
        .bind(product.updated_at())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;

        // The row may have been deleted between the read and the write.
        row.as_ref().map(row_to_product).transpose()
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1
            RETURNING id, name, description, price, category, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_product", e))?;

        row.as_ref().map(row_to_product).transpose()
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, category, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product", e))?;

        row.as_ref().map(row_to_product).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, category, created_at, updated_at
            FROM products
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.iter().map(row_to_product).collect()
    }
}
