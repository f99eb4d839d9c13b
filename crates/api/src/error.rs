//! # API 统一错误处理
//!
//! 将下层错误类型统一映射到 HTTP 状态码与 `{ message }` JSON 响应体。

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kurabe_core::compare::error::CompareError;
use thiserror::Error;

use crate::types::ErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求参数错误 (400)
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 下层业务错误 (500)
    #[error("内部服务错误: {0}")]
    Internal(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("内部服务错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::from_msg(message))).into_response()
    }
}

/// 从 `CompareError` 转换
impl From<CompareError> for ApiError {
    fn from(err: CompareError) -> Self {
        match err {
            CompareError::Validation(msg) => ApiError::BadRequest(msg),
            CompareError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// 请求体不是合法 JSON 或字段类型不匹配
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
