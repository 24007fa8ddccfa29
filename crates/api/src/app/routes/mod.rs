use axum::Router;

pub mod products;
pub mod shop;
pub mod system;

/// Router for the catalog endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/shop", shop::router())
}
