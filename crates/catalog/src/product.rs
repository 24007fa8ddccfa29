use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use storefront_core::{DomainError, DomainResult, ProductId};

/// Product fields exactly as submitted by a client.
///
/// Values stay raw JSON until [`ProductDraft::validate`] casts them, so a
/// badly typed field is a validation failure rather than a decoding one. The
/// store validates before anything is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: Option<JsonValue>,
    pub description: Option<JsonValue>,
    pub price: Option<JsonValue>,
    pub category: Option<JsonValue>,
}

impl ProductDraft {
    /// Schema validation: all four fields present, strings non-blank,
    /// price finite and not negative.
    ///
    /// Numbers and booleans are accepted as text. A price may be a number or
    /// a numeric string.
    pub fn validate(self) -> DomainResult<ProductFields> {
        let name = required_text("name", self.name)?;
        let description = required_text("description", self.description)?;
        let category = required_text("category", self.category)?;

        let price = required_price(self.price)?;
        if !price.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if price < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }

        Ok(ProductFields {
            name,
            description,
            price,
            category,
        })
    }
}

fn required_text(field: &str, value: Option<JsonValue>) -> DomainResult<String> {
    let text = match value {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        Some(JsonValue::Bool(b)) => Some(b.to_string()),
        Some(_) => return Err(DomainError::validation(format!("{field} must be a string"))),
    };
    match text {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::validation(format!("{field} is required"))),
    }
}

fn required_price(value: Option<JsonValue>) -> DomainResult<f64> {
    let missing = || DomainError::validation("price is required");
    let not_a_number = || DomainError::validation("price must be a number");

    match value {
        None | Some(JsonValue::Null) => Err(missing()),
        Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(not_a_number),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Err(missing()),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().map_err(|_| not_a_number()),
        Some(_) => Err(not_a_number()),
    }
}

/// The four validated, user-editable fields of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

impl From<ProductFields> for ProductDraft {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: Some(JsonValue::String(fields.name)),
            description: Some(JsonValue::String(fields.description)),
            price: Some(JsonValue::from(fields.price)),
            category: Some(JsonValue::String(fields.category)),
        }
    }
}

/// A persisted catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: f64,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a freshly created product. Only stores call this.
    pub fn new(id: ProductId, fields: ProductFields, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a product from storage with its original timestamps.
    pub fn from_parts(
        id: ProductId,
        fields: ProductFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            updated_at,
            ..Self::new(id, fields, created_at)
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            category: self.category.clone(),
        }
    }

    /// Full-field replace.
    ///
    /// Returns `false` and leaves `updated_at` alone when nothing changed, so
    /// re-persisting an unmodified product is a no-op.
    pub fn replace(&mut self, fields: ProductFields, now: DateTime<Utc>) -> bool {
        if self.fields() == fields {
            return false;
        }
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.category = fields.category;
        self.updated_at = now;
        true
    }
}
