use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{post, put},
};
use serde_json::json;
use tracing::{error, info};

use crate::app::dto::{JsonBody, ProductRequest};
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(get_shop))
        .route(
            "/:id",
            put(update_product).patch(update_product).delete(delete_product),
        )
        .route("/:id/buy", post(buy_product))
}

/// `POST /products`. Field validation is left to the store.
pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<ProductRequest>,
) -> Result<Response, ApiError> {
    let product = services
        .store()
        .create(body.into())
        .await
        .inspect_err(|e| error!(error = %e, "error saving product"))?;

    info!(product_id = %product.id(), "product created");
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Product saved successfully!", "data": product })),
    )
        .into_response())
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ProductRequest>,
) -> Result<Response, ApiError> {
    let id = errors::parse_product_id(&id)?;

    let updated = services
        .store()
        .update(id, body.into())
        .await
        .inspect_err(|e| error!(error = %e, product_id = %id, "error updating product"))?
        .ok_or(ApiError::NotFound)?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Product updated successfully!", "data": updated })),
    )
        .into_response())
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = errors::parse_product_id(&id)?;

    services
        .store()
        .delete(id)
        .await
        .inspect_err(|e| error!(error = %e, product_id = %id, "error deleting product"))?
        .ok_or(ApiError::NotFound)?;

    info!(product_id = %id, "product deleted");
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Product deleted successfully!" })),
    )
        .into_response())
}

/// `GET /products`: the whole catalog, unpaginated.
pub async fn get_shop(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let products = services
        .store()
        .list()
        .await
        .inspect_err(|e| error!(error = %e, "error getting products"))?;

    Ok((StatusCode::OK, Json(json!({ "data": products }))).into_response())
}

/// `POST /products/{id}/buy`: fetch the product and re-persist it as is.
///
/// Stock is not tracked, so nothing about the product changes.
pub async fn buy_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = errors::parse_product_id(&id)?;
    let store = services.store();

    let product = store
        .find_by_id(id)
        .await
        .inspect_err(|e| error!(error = %e, product_id = %id, "error purchasing product"))?
        .ok_or(ApiError::NotFound)?;

    let product = store
        .update(id, product.fields().into())
        .await
        .inspect_err(|e| error!(error = %e, product_id = %id, "error purchasing product"))?
        .ok_or(ApiError::NotFound)?;

    info!(product_id = %id, "product purchased");
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Product purchased successfully!", "data": product })),
    )
        .into_response())
}
