//! # 产品目录服务
//!
//! 通过 HTTP 暴露单一的产品资源：
//! - `GET /products` 公开的产品列表
//! - `GET /products/:id` 需要认证的产品详情
//! - `POST /products` 需要 `admin` 角色的产品创建
//!
//! 分层结构：
//! - `app` 应用层，路由、处理器、业务服务与内存存储
//! - `core` 核心层，错误处理、响应结构、中间件与访问门禁
//! - `infrastructure` 基础设施层，配置与日志

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{router, AppState};
pub use crate::core::error::CoreError;
pub use infrastructure::config::AppConfig;
