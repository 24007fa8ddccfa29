//! Content shapes handed to the layout generator.
//!
//! These are transient: built from one request, rendered once, never stored.
//! Field values are kept as the client sent them and forwarded untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use storefront_core::{DomainError, DomainResult};

/// Message returned when a hero request lacks its heading or subhead.
pub const HERO_FIELDS_REQUIRED: &str = "Heading and subhead are required fields.";

/// Message returned when a product card request lacks any field.
pub const CARD_FIELDS_REQUIRED: &str = "All fields are required.";

/// Content for the shop hero banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroLayout {
    pub heading: JsonValue,
    pub subhead: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<JsonValue>,
    /// Call-to-action descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<JsonValue>,
}

impl HeroLayout {
    /// Presence check on heading and subhead only.
    pub fn try_new(
        heading: Option<JsonValue>,
        subhead: Option<JsonValue>,
        image: Option<JsonValue>,
        cta: Option<JsonValue>,
        style: Option<JsonValue>,
    ) -> DomainResult<Self> {
        match (present(heading), present(subhead)) {
            (Some(heading), Some(subhead)) => Ok(Self {
                heading,
                subhead,
                image,
                cta,
                style,
            }),
            _ => Err(DomainError::validation(HERO_FIELDS_REQUIRED)),
        }
    }
}

/// Content for a single product card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub name: JsonValue,
    pub description: JsonValue,
    pub price: JsonValue,
    pub category: JsonValue,
}

impl ProductCard {
    /// Presence check over all four fields. A zero price counts as missing.
    pub fn try_new(
        name: Option<JsonValue>,
        description: Option<JsonValue>,
        price: Option<JsonValue>,
        category: Option<JsonValue>,
    ) -> DomainResult<Self> {
        match (present(name), present(description), present(price), present(category)) {
            (Some(name), Some(description), Some(price), Some(category)) => Ok(Self {
                name,
                description,
                price,
                category,
            }),
            _ => Err(DomainError::validation(CARD_FIELDS_REQUIRED)),
        }
    }
}

/// A value is present unless it is null, `false`, zero or an empty string.
pub fn is_present(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn present(value: Option<JsonValue>) -> Option<JsonValue> {
    value.filter(is_present)
}

/// Rendered UI fragment returned by the layout generator.
///
/// Opaque to the catalog: it is embedded in responses as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Component(JsonValue);

impl Component {
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }

    pub fn into_value(self) -> JsonValue {
        self.0
    }
}
