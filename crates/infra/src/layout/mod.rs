//! Layout generator: turns content fields into renderable UI components.

pub mod http;
pub mod template;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use storefront_catalog::{Component, HeroLayout, ProductCard};

pub use http::HttpLayoutGenerator;
pub use template::TemplateLayoutGenerator;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// The request never produced a response (connect, timeout, TLS...).
    #[error("layout request failed: {0}")]
    Transport(String),

    /// The generator answered with a non-success status.
    #[error("layout service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The generator answered 2xx but the body was not JSON.
    #[error("invalid layout response: {0}")]
    InvalidResponse(String),

    #[error("invalid layout client configuration: {0}")]
    Config(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Renders catalog content into UI components.
///
/// Callers issue exactly one render call per request; implementations do not
/// retry.
#[async_trait]
pub trait LayoutGenerator: Send + Sync {
    async fn render_hero(&self, hero: &HeroLayout) -> LayoutResult<Component>;

    async fn render_card(&self, card: &ProductCard) -> LayoutResult<Component>;
}

#[async_trait]
impl<G> LayoutGenerator for Arc<G>
where
    G: LayoutGenerator + ?Sized,
{
    async fn render_hero(&self, hero: &HeroLayout) -> LayoutResult<Component> {
        (**self).render_hero(hero).await
    }

    async fn render_card(&self, card: &ProductCard) -> LayoutResult<Component> {
        (**self).render_card(card).await
    }
}
