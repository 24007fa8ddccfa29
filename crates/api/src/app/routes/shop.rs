use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use tracing::error;

use crate::app::dto::{HeroRequest, JsonBody, ProductRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/hero", post(get_shop_hero))
        .route("/card", post(get_shop_card))
}

/// `POST /shop/hero`. The generator is called at most once per request.
pub async fn get_shop_hero(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<HeroRequest>,
) -> Result<Response, ApiError> {
    let hero = body.into_hero()?;

    let component = services
        .layout()
        .render_hero(&hero)
        .await
        .inspect_err(|e| error!(error = %e, "error generating hero section"))?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Hero section generated successfully", "component": component })),
    )
        .into_response())
}

/// `POST /shop/card`. Renders a card without persisting anything.
pub async fn get_shop_card(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<ProductRequest>,
) -> Result<Response, ApiError> {
    let card = body.into_card()?;

    let component = services
        .layout()
        .render_card(&card)
        .await
        .inspect_err(|e| error!(error = %e, "error generating product card"))?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Product card generated successfully", "component": component })),
    )
        .into_response())
}
