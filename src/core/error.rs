//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// 请求体未通过字段校验，携带每条违规信息
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("{0}")]
    BadRequest(String),
    /// 访问门禁拒绝，状态码由门禁策略决定
    #[error("{message}")]
    AccessDenied { status: StatusCode, message: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

/// 错误信息，单条或多条
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorMessage {
    Single(String),
    Many(Vec<String>),
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: ErrorMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: ErrorMessage) -> Self {
        Self {
            status_code: status.as_u16(),
            message,
            error: status.canonical_reason().map(str::to_string),
        }
    }
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) | CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::AccessDenied { status, .. } => *status,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            CoreError::Validation(messages) => ErrorMessage::Many(messages),
            CoreError::Internal(msg) => {
                tracing::error!("内部错误: {}", msg);
                ErrorMessage::Single("Internal server error".to_string())
            }
            CoreError::BadRequest(msg)
            | CoreError::NotFound(msg)
            | CoreError::AccessDenied { message: msg, .. } => ErrorMessage::Single(msg),
        };

        (status, Json(ErrorResponse::new(status, message))).into_response()
    }
}
