//! 产品资源

pub mod handler;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

use axum::{routing::get, Router};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route("/products/:id", get(handler::get_product))
}
