//! Product persistence abstractions.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use storefront_catalog::{Product, ProductDraft};
use storefront_core::{DomainError, ProductId};

pub use in_memory::InMemoryProductStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresProductStore;

/// Product store operation error.
///
/// A missing product is not an error: lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The submitted fields failed schema validation.
    #[error("schema validation failed: {0}")]
    Validation(#[from] DomainError),

    /// The backend failed (connection, query, poisoned lock...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence capability for catalog products.
///
/// Implementations validate drafts with [`ProductDraft::validate`] before
/// writing, assign identifiers on create, and serialize concurrent writes to
/// the same product.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new product; the store assigns its identifier.
    async fn create(&self, draft: ProductDraft) -> StoreResult<Product>;

    /// Replace all four fields on an existing product and return it post-update.
    async fn update(&self, id: ProductId, draft: ProductDraft) -> StoreResult<Option<Product>>;

    /// Remove a product, returning it if it existed.
    async fn delete(&self, id: ProductId) -> StoreResult<Option<Product>>;

    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Every product, oldest first.
    async fn list(&self) -> StoreResult<Vec<Product>>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn create(&self, draft: ProductDraft) -> StoreResult<Product> {
        (**self).create(draft).await
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> StoreResult<Option<Product>> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).delete(id).await
    }

    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).find_by_id(id).await
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        (**self).list().await
    }
}
