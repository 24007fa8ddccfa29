use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use storefront_core::{DomainError, ProductId};
use storefront_infra::{LayoutError, StoreError};

pub const SERVER_ERROR: &str = "Server error";
pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const INVALID_BODY: &str = "Invalid request body.";

/// Every failure a handler can produce.
///
/// Only the variant decides the status code; infrastructure detail stays in
/// the logs and the client sees `"Server error"`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or the body could not be decoded (400).
    #[error("{0}")]
    Validation(String),

    /// No product matches the identifier (404).
    #[error("product not found")]
    NotFound,

    /// The store or the layout generator failed (500).
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => ApiError::Validation(msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Infrastructure(err.to_string())
    }
}

impl From<LayoutError> for ApiError {
    fn from(err: LayoutError) -> Self {
        ApiError::Infrastructure(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(msg) => json_error(status, msg),
            ApiError::NotFound => json_error(status, PRODUCT_NOT_FOUND),
            ApiError::Infrastructure(_) => json_error(status, SERVER_ERROR),
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// A path segment that is not a valid identifier cannot name any product.
pub fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse().map_err(|_: DomainError| ApiError::NotFound)
}
