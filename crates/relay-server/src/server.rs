//! HTTP Server - Ollama 兼容的聊天网关接口

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{chat_handler, delete_handler, health_handler, tags_handler, version_handler};
use crate::state::Gateway;

/// 运行 HTTP 服务器
pub async fn run_server(gateway: Gateway, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(Arc::new(gateway));

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}:{}: {}", host, port, e))?;
    let addr = listener.local_addr()?;

    tracing::info!("Relay gateway listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// 创建路由
pub fn create_router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_handler))
        // 聊天
        .route("/api/chat", post(chat_handler))
        .route("/v1/chat/completions", post(chat_handler))
        // 模型管理
        .route("/api/tags", get(tags_handler))
        .route("/api/delete/:model_name", delete(delete_handler))
        .route("/api/version", get(version_handler))
        // 中间件
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}
