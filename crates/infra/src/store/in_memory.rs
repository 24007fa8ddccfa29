use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use storefront_catalog::{Product, ProductDraft};
use storefront_core::ProductId;

use super::{ProductStore, StoreError, StoreResult};

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("product map lock poisoned".to_string())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, draft: ProductDraft) -> StoreResult<Product> {
        let fields = draft.validate()?;
        let product = Product::new(ProductId::new(), fields, Utc::now());

        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(product.id(), product.clone());
        Ok(product)
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> StoreResult<Option<Product>> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let Some(product) = map.get_mut(&id) else {
            return Ok(None);
        };

        // Validate only once the target exists, so an unknown id stays a not-found.
        let fields = draft.validate()?;
        product.replace(fields, Utc::now());
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id))
    }

    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut products: Vec<Product> = map.values().cloned().collect();
        products.sort_by_key(|p| (p.created_at(), p.id()));
        Ok(products)
    }
}
