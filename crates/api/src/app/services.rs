use std::sync::Arc;

use storefront_infra::{
    AppConfig, LayoutGenerator, ProductStore,
    layout::{HttpLayoutGenerator, TemplateLayoutGenerator},
    store::InMemoryProductStore,
};

/// Collaborators the handlers delegate to, injected into the router.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn ProductStore>,
    layout: Arc<dyn LayoutGenerator>,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>, layout: Arc<dyn LayoutGenerator>) -> Self {
        Self { store, layout }
    }

    /// In-memory store + local template renderer (dev/test).
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryProductStore::new()),
            Arc::new(TemplateLayoutGenerator::new()),
        )
    }

    pub fn store(&self) -> &dyn ProductStore {
        self.store.as_ref()
    }

    pub fn layout(&self) -> &dyn LayoutGenerator {
        self.layout.as_ref()
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store = build_store(config).await?;

    let layout: Arc<dyn LayoutGenerator> = match &config.layout_api {
        Some(api) => {
            tracing::info!(base_url = %api.base_url, "using remote layout generator");
            Arc::new(HttpLayoutGenerator::new(
                api.base_url.clone(),
                api.api_key.clone(),
                api.timeout,
            )?)
        }
        None => {
            tracing::info!("LAYOUT_API_URL not set; rendering components locally");
            Arc::new(TemplateLayoutGenerator::new())
        }
    };

    Ok(AppServices::new(store, layout))
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ProductStore>> {
    if config.use_persistent_stores {
        #[cfg(feature = "postgres")]
        {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for persistent stores"))?;
            let store = storefront_infra::store::PostgresProductStore::connect(url).await?;
            tracing::info!("using postgres product store");
            return Ok(Arc::new(store));
        }
        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
            );
        }
    }

    Ok(Arc::new(InMemoryProductStore::new()))
}
