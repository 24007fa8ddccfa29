//! HTTP client for a remote layout generation service.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use storefront_catalog::{Component, HeroLayout, ProductCard};

use super::{LayoutError, LayoutGenerator, LayoutResult};

/// Calls `POST {base_url}/hero` and `POST {base_url}/card`; the JSON response
/// body is the rendered component.
#[derive(Debug, Clone)]
pub struct HttpLayoutGenerator {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpLayoutGenerator {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> LayoutResult<Self> {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(LayoutError::Config("base url is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LayoutError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> LayoutResult<Component> {
        let url = format!("{}/{}", self.base_url, path);
        let mut req = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| LayoutError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LayoutError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| LayoutError::InvalidResponse(e.to_string()))?;
        debug!(%url, "layout component received");
        Ok(Component::new(value))
    }
}

#[async_trait]
impl LayoutGenerator for HttpLayoutGenerator {
    #[instrument(skip_all, fields(base_url = %self.base_url))]
    async fn render_hero(&self, hero: &HeroLayout) -> LayoutResult<Component> {
        self.post_json("hero", hero).await
    }

    #[instrument(skip_all, fields(base_url = %self.base_url))]
    async fn render_card(&self, card: &ProductCard) -> LayoutResult<Component> {
        self.post_json("card", card).await
    }
}
