//! Ollama 兼容的辅助接口：模型列表、删除、版本、健康检查

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use relay_llm::RouteEntry;
use serde::Serialize;
use serde_json::json;

use crate::state::Gateway;

/// 对外报告的网关版本
pub const GATEWAY_VERSION: &str = "0.1.0";

/// `GET /api/tags` 响应
#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub models: Vec<ModelTag>,
}

/// 单个模型条目（Ollama 格式）
#[derive(Debug, Serialize)]
pub struct ModelTag {
    pub name: String,
    pub model: String,
    pub modified_at: String,
    pub size: u64,
    pub digest: String,
    pub details: ModelDetails,
}

#[derive(Debug, Serialize)]
pub struct ModelDetails {
    pub parent_model: String,
    pub format: String,
    pub family: String,
    pub families: Vec<String>,
    pub parameter_size: String,
    pub quantization_level: String,
}

impl ModelTag {
    fn from_entry(entry: &RouteEntry, modified_at: &str) -> Self {
        let family = entry.binding.kind.as_str().to_string();
        Self {
            name: entry.name.clone(),
            model: entry.binding.upstream_model.clone(),
            modified_at: modified_at.to_string(),
            size: 0,
            digest: String::new(),
            details: ModelDetails {
                parent_model: String::new(),
                format: "api".to_string(),
                families: vec![family.clone()],
                family,
                parameter_size: String::new(),
                quantization_level: String::new(),
            },
        }
    }
}

/// 列出所有已配置的模型（按配置顺序）
pub async fn tags_handler(State(gateway): State<Arc<Gateway>>) -> Json<TagsResponse> {
    let models = gateway
        .router()
        .entries()
        .map(|entry| ModelTag::from_entry(entry, gateway.started_at()))
        .collect();

    Json(TagsResponse { models })
}

/// Ollama 兼容：删除模型为空操作
pub async fn delete_handler(Path(model_name): Path<String>) -> impl IntoResponse {
    tracing::debug!("Ignoring delete request for {}", model_name);
    Json(json!({ "status": "ok" }))
}

/// 版本
pub async fn version_handler() -> impl IntoResponse {
    Json(json!({ "version": GATEWAY_VERSION }))
}

/// 健康检查处理器
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
