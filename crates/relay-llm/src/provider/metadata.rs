use async_trait::async_trait;
use relay_core::{ChatRequest, ChatResponse, ProviderKind};

use crate::error::Result;
use crate::provider::ProviderBinding;
use crate::transformer::LLMStream;

/// LLM Provider trait
///
/// One implementation per provider family. The binding carries the upstream
/// model name, base URL and credential for the model being called.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the provider family
    fn kind(&self) -> ProviderKind;

    /// Get provider metadata
    fn metadata(&self) -> &ProviderMetadata;

    /// Send a chat request and get a complete response
    async fn chat(&self, binding: &ProviderBinding, request: &ChatRequest) -> Result<ChatResponse>;

    /// Send a chat request and stream the response
    ///
    /// Errors raised before the first chunk (missing credential, upstream
    /// status) are returned here; errors after that arrive as stream items.
    async fn chat_stream(&self, binding: &ProviderBinding, request: &ChatRequest) -> Result<LLMStream>;
}

/// Provider metadata
#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub kind: ProviderKind,
    /// Human-readable name
    pub name: String,
    pub capabilities: ProviderCapabilities,
}

impl ProviderMetadata {
    pub fn new(kind: ProviderKind, capabilities: ProviderCapabilities) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            capabilities,
        }
    }
}

/// Provider capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Upstream delivers partial content over one connection.
    /// When false, `chat_stream` yields the whole answer as a single final chunk.
    pub incremental_streaming: bool,
}

impl ProviderCapabilities {
    pub fn incremental() -> Self {
        Self { incremental_streaming: true }
    }

    pub fn buffered() -> Self {
        Self { incremental_streaming: false }
    }
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self::buffered()
    }
}
