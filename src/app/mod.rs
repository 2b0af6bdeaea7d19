//! 应用层：路由与共享状态

pub mod health;
pub mod products;

use axum::{
    http::{Method, Uri},
    middleware,
    routing::get,
    Router,
};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::{auth::AccessGuard, error::CoreError, middleware::request_logging_middleware};
use crate::infrastructure::config::AppConfig;
use products::{service::ProductService, store::ProductStore};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub guard: AccessGuard,
}

impl AppState {
    pub fn new(product_service: ProductService, guard: AccessGuard) -> Self {
        Self {
            product_service,
            guard,
        }
    }

    /// 按配置组装：种子存储 -> 产品服务，认证配置 -> 门禁
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        let store = Arc::new(ProductStore::seeded());
        Ok(Self::new(
            ProductService::new(store),
            AccessGuard::from_config(&config.auth)?,
        ))
    }
}

/// 构建完整路由，包括中间件层
pub fn router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(products::routes())
        .fallback(route_not_found)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

async fn route_not_found(method: Method, uri: Uri) -> CoreError {
    CoreError::NotFound(format!("Cannot {} {}", method, uri.path()))
}
