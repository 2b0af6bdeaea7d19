//! 核心层：错误、响应、中间件与访问门禁

pub mod auth;
pub mod error;
pub mod middleware;
pub mod response;
