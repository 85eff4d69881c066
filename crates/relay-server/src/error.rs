//! HTTP 错误映射
//!
//! 所有错误响应体统一为 `{"error": message}`；上游错误原样透传状态码和响应体。

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use relay_llm::LLMError;
use serde_json::json;
use thiserror::Error;

/// 网关错误
#[derive(Error, Debug)]
pub enum GatewayError {
    /// 请求体无法解析
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Llm(#[from] LLMError),
}

impl GatewayError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Llm(e) => match e {
                LLMError::ModelNotFound(_) => StatusCode::NOT_FOUND,
                LLMError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                LLMError::Upstream { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                LLMError::Network(_) | LLMError::Stream(_) => StatusCode::BAD_GATEWAY,
                LLMError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                LLMError::ProviderNotConfigured(_)
                | LLMError::UnsupportedProvider(_)
                | LLMError::Transform(_)
                | LLMError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            // 上游响应体原样返回
            GatewayError::Llm(LLMError::Upstream { body, .. }) => {
                (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
