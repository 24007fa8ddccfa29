use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use tracing::debug;

use storefront_catalog::{HeroLayout, ProductCard, ProductDraft};
use storefront_core::DomainResult;

use crate::app::errors::{ApiError, INVALID_BODY};

// -------------------------
// Request DTOs
// -------------------------

/// Body of create/update product and product card requests.
///
/// Fields are decoded as raw JSON so that missing or badly typed values reach
/// validation instead of failing decoding.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub name: Option<JsonValue>,
    pub description: Option<JsonValue>,
    pub price: Option<JsonValue>,
    pub category: Option<JsonValue>,
}

impl From<ProductRequest> for ProductDraft {
    fn from(body: ProductRequest) -> Self {
        ProductDraft {
            name: body.name,
            description: body.description,
            price: body.price,
            category: body.category,
        }
    }
}

impl ProductRequest {
    pub fn into_card(self) -> DomainResult<ProductCard> {
        ProductCard::try_new(self.name, self.description, self.price, self.category)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroRequest {
    pub heading: Option<JsonValue>,
    pub sub_head: Option<JsonValue>,
    pub image: Option<JsonValue>,
    pub cta: Option<JsonValue>,
    pub style: Option<JsonValue>,
}

impl HeroRequest {
    pub fn into_hero(self) -> DomainResult<HeroLayout> {
        HeroLayout::try_new(self.heading, self.sub_head, self.image, self.cta, self.style)
    }
}

// -------------------------
// Body extraction
// -------------------------

/// JSON body extractor whose rejections use the API error envelope.
///
/// Only bodies sent as `application/json` (or a `+json` type) are decoded.
/// Any other content type, a missing one, or an empty body yields
/// `T::default()`, leaving the presence checks to report what is missing.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Ok(Self(T::default()));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!(error = %e, "failed to read request body");
            ApiError::Validation(INVALID_BODY.to_string())
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        serde_json::from_slice(&bytes).map(Self).map_err(|e| {
            debug!(error = %e, "failed to decode request body");
            ApiError::Validation(INVALID_BODY.to_string())
        })
    }
}
