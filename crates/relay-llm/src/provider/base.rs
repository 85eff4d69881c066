use async_trait::async_trait;
use eventsource_stream::{EventStreamError, Eventsource};
use futures::StreamExt;
use relay_core::{ChatRequest, ChatResponse, ProviderKind, StreamChunk};
use reqwest::{header, Client};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{LLMError, Result};
use crate::provider::{LLMProvider, ProviderBinding, ProviderCapabilities, ProviderMetadata};
use crate::transformer::utils::preview;
use crate::transformer::{LLMStream, SchemaTransformer};

/// Build the shared outbound HTTP client
///
/// `timeout` bounds each wait on the upstream (connecting, then every read),
/// not the whole exchange, so a stream may run as long as frames keep coming.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .build()
        .map_err(|e| LLMError::Config(e.to_string()))
}

/// Base provider implementation
/// Handles common HTTP functionality and delegates schema transformation
pub struct BaseProvider<T: SchemaTransformer> {
    http_client: Client,
    transformer: Arc<T>,
    pub metadata: ProviderMetadata,
}

impl<T: SchemaTransformer + 'static> BaseProvider<T> {
    /// Create a new base provider on top of a shared client
    pub fn new(http_client: Client, transformer: T) -> Self {
        let capabilities = if transformer.incremental_streaming() {
            ProviderCapabilities::incremental()
        } else {
            ProviderCapabilities::buffered()
        };

        Self {
            http_client,
            metadata: ProviderMetadata::new(transformer.kind(), capabilities),
            transformer: Arc::new(transformer),
        }
    }

    /// Build request headers
    fn build_headers(&self, api_key: &str) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        for (name, value) in self.transformer.auth_headers(api_key) {
            let value = header::HeaderValue::from_str(&value)
                .map_err(|e| LLMError::Config(format!("Invalid header value for {}: {}", name, e)))?;
            headers.insert(header::HeaderName::from_static(name), value);
        }

        Ok(headers)
    }

    /// POST the translated request and check the upstream status
    async fn post(
        &self,
        binding: &ProviderBinding,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<reqwest::Response> {
        // No credential, no network call
        let api_key = binding.require_api_key()?;

        let body = self.transformer.transform_request(binding, request, stream)?;
        let headers = self.build_headers(api_key)?;
        let url = self.transformer.endpoint(binding, api_key);

        log::debug!(
            "[{}] POST {} model={} stream={}",
            self.metadata.kind,
            binding.base_url,
            binding.upstream_model,
            stream
        );

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(LLMError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!(
                "[{}] upstream returned {}: {}",
                self.metadata.kind,
                status,
                preview(&body, 500)
            );
            return Err(LLMError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Send a non-streaming request
    pub async fn send_request(
        &self,
        binding: &ProviderBinding,
        request: &ChatRequest,
    ) -> Result<ChatResponse> {
        let response = self.post(binding, request, false).await?;

        let text = response.text().await.map_err(LLMError::from_transport)?;
        let data: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "[{}] undecodable upstream payload: {}",
                self.metadata.kind,
                preview(&text, 500)
            );
            LLMError::Transform(e.into())
        })?;

        Ok(self.transformer.parse_response(&request.model, &data)?)
    }

    /// Send a streaming request over SSE
    ///
    /// Frames that fail to parse are logged and skipped. A transport error or
    /// an upstream that closes before its terminal marker ends the stream with
    /// an error item, so the consumer can tell the answer is truncated.
    pub async fn send_stream_request(
        &self,
        binding: &ProviderBinding,
        request: &ChatRequest,
    ) -> Result<LLMStream> {
        let response = self.post(binding, request, true).await?;

        let transformer = self.transformer.clone();
        let kind = self.metadata.kind;
        let model = request.model.clone();

        let stream = async_stream::stream! {
            let mut events = response.bytes_stream().eventsource();

            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        let data = event.data.trim();
                        if data.is_empty() {
                            continue;
                        }

                        match transformer.parse_stream_chunk(&model, data) {
                            Ok(Some(chunk)) => {
                                let done = chunk.is_done();
                                yield Ok(chunk);
                                if done {
                                    return;
                                }
                            }
                            Ok(None) => {}
                            Err(e) => {
                                log::warn!("[{}] skipping malformed stream frame ({}): {}", kind, e, preview(data, 200));
                            }
                        }
                    }
                    Err(e) => {
                        let message = match e {
                            EventStreamError::Transport(e) => e.without_url().to_string(),
                            other => other.to_string(),
                        };
                        log::error!("[{}] stream interrupted: {}", kind, message);
                        yield Err(LLMError::Stream(message));
                        return;
                    }
                }
            }

            log::warn!("[{}] upstream closed the stream before [DONE]", kind);
            yield Err(LLMError::Stream("upstream closed the stream before [DONE]".to_string()));
        };

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl<T: SchemaTransformer + 'static> LLMProvider for BaseProvider<T> {
    fn kind(&self) -> ProviderKind {
        self.metadata.kind
    }

    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn chat(&self, binding: &ProviderBinding, request: &ChatRequest) -> Result<ChatResponse> {
        self.send_request(binding, request).await
    }

    async fn chat_stream(&self, binding: &ProviderBinding, request: &ChatRequest) -> Result<LLMStream> {
        if self.metadata.capabilities.incremental_streaming {
            return self.send_stream_request(binding, request).await;
        }

        // One buffered call, delivered as a single final chunk
        let response = self.send_request(binding, request).await?;
        let chunk = StreamChunk::from_response(response);
        Ok(Box::pin(futures::stream::once(futures::future::ready(Ok(chunk)))))
    }
}
