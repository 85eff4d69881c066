//! 网关共享状态
//!
//! 启动时构建一次，之后只读；所有请求通过 `Arc<Gateway>` 共享，不需要锁。

use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use relay_config::{Config, GenerationDefaults};
use relay_core::{ChatRequest, ChatResponse};
use relay_llm::{
    build_http_client, AdapterRegistry, LLMError, LLMProvider, LLMStream, ModelRouter,
    ProviderBinding,
};
use uuid::Uuid;

/// 网关：模型路由 + provider 适配器 + 默认采样参数
pub struct Gateway {
    router: ModelRouter,
    registry: AdapterRegistry,
    defaults: GenerationDefaults,
    /// 启动时间，用作模型列表的 modified_at
    started_at: String,
}

impl Gateway {
    pub fn new(router: ModelRouter, registry: AdapterRegistry, defaults: GenerationDefaults) -> Self {
        Self {
            router,
            registry,
            defaults,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// 根据配置构建网关，所有 adapter 共享同一个 HTTP client
    pub fn from_config(config: &Config) -> Result<Self, LLMError> {
        let client = build_http_client(config.http.timeout())?;
        Ok(Self::new(
            ModelRouter::from_config(config),
            AdapterRegistry::with_defaults(client),
            config.defaults,
        ))
    }

    pub fn router(&self) -> &ModelRouter {
        &self.router
    }

    pub fn defaults(&self) -> &GenerationDefaults {
        &self.defaults
    }

    pub fn started_at(&self) -> &str {
        &self.started_at
    }

    /// Received → Routed
    fn route(
        &self,
        request_id: &str,
        request: &ChatRequest,
    ) -> Result<(&ProviderBinding, Arc<dyn LLMProvider>), LLMError> {
        tracing::debug!(
            "[{}] Received chat request for model {} ({} messages, stream={})",
            request_id,
            request.model,
            request.messages.len(),
            request.stream
        );

        request.validate()?;
        let binding = self.router.resolve(&request.model)?;
        let adapter = self.registry.get(binding.kind)?;

        tracing::debug!(
            "[{}] Routed {} to {}/{}",
            request_id,
            request.model,
            binding.kind,
            binding.upstream_model
        );

        Ok((binding, adapter))
    }

    /// 非流式请求：返回一个完整的 ChatResponse
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LLMError> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let result = match self.route(&request_id, request) {
            Ok((binding, adapter)) => {
                tracing::info!("[{}] Dispatched {} to {}", request_id, request.model, binding.kind);
                adapter.chat(binding, request).await
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(response) => tracing::info!(
                "[{}] Completed in {:?} ({} chars)",
                request_id,
                start.elapsed(),
                response.text().len()
            ),
            Err(e) => tracing::warn!("[{}] Failed after {:?}: {}", request_id, start.elapsed(), e),
        }

        result
    }

    /// 流式请求
    ///
    /// 建立上游连接前的错误同步返回；之后的错误作为流中的最后一个元素出现。
    pub async fn chat_stream(&self, request: &ChatRequest) -> Result<LLMStream, LLMError> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let (binding, adapter) = self.route(&request_id, request).map_err(|e| {
            tracing::warn!("[{}] Failed: {}", request_id, e);
            e
        })?;

        tracing::info!(
            "[{}] Dispatched {} to {} (streaming)",
            request_id,
            request.model,
            binding.kind
        );

        let stream = adapter.chat_stream(binding, request).await.map_err(|e| {
            tracing::warn!("[{}] Failed after {:?}: {}", request_id, start.elapsed(), e);
            e
        })?;

        let mut chunks = 0usize;
        let stream = stream.inspect(move |item| match item {
            Ok(chunk) => {
                chunks += 1;
                if chunk.done {
                    tracing::info!(
                        "[{}] Completed in {:?} ({} chunks)",
                        request_id,
                        start.elapsed(),
                        chunks
                    );
                }
            }
            Err(e) => tracing::warn!(
                "[{}] Failed after {:?} and {} chunks: {}",
                request_id,
                start.elapsed(),
                chunks,
                e
            ),
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{Message, ProviderKind};

    fn gateway() -> Gateway {
        Gateway::from_config(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_model() {
        let request = ChatRequest::new("llama-9000").with_message(Message::user("Hi"));
        let err = gateway().chat(&request).await.unwrap_err();
        assert!(matches!(err, LLMError::ModelNotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_messages_rejected() {
        let request = ChatRequest::new("gpt-4o");
        let err = gateway().chat(&request).await.unwrap_err();
        assert!(matches!(err, LLMError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_key_stream_fails_synchronously() {
        let request = ChatRequest::new("gemini-pro")
            .with_message(Message::user("Hi"))
            .stream(true);
        let result = gateway().chat_stream(&request).await;
        assert!(matches!(result, Err(LLMError::ProviderNotConfigured(ProviderKind::Gemini))));
    }

    #[test]
    fn test_missing_adapter_is_unsupported() {
        let gateway = Gateway::new(
            ModelRouter::from_config(&Config::default()),
            AdapterRegistry::new(),
            GenerationDefaults::default(),
        );
        let request = ChatRequest::new("gpt-4o").with_message(Message::user("Hi"));
        let err = gateway.route("test", &request).err().unwrap();
        assert!(matches!(err, LLMError::UnsupportedProvider(ProviderKind::OpenAi)));
    }
}
