use relay_core::ProviderKind;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{LLMError, Result};
use crate::provider::{BaseProvider, LLMProvider};
use crate::transformer::{
    AnthropicTransformer, GeminiTransformer, HuggingFaceTransformer, OpenAiTransformer,
};

/// One adapter per provider family
///
/// Adapters are stateless apart from the shared HTTP client, so a single
/// instance serves every model bound to that family.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<ProviderKind, Arc<dyn LLMProvider>>,
}

impl AdapterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four built-in adapters sharing `client`
    pub fn with_defaults(client: Client) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BaseProvider::new(client.clone(), OpenAiTransformer::new())));
        registry.register(Arc::new(BaseProvider::new(client.clone(), HuggingFaceTransformer::new())));
        registry.register(Arc::new(BaseProvider::new(client.clone(), GeminiTransformer::new())));
        registry.register(Arc::new(BaseProvider::new(client, AnthropicTransformer::new())));
        registry
    }

    /// Register an adapter, replacing any previous one for the same family
    pub fn register(&mut self, provider: Arc<dyn LLMProvider>) {
        log::debug!("Registering adapter for {}", provider.kind());
        self.adapters.insert(provider.kind(), provider);
    }

    /// Adapter for a provider family
    pub fn get(&self, kind: ProviderKind) -> Result<Arc<dyn LLMProvider>> {
        self.adapters
            .get(&kind)
            .cloned()
            .ok_or(LLMError::UnsupportedProvider(kind))
    }

    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.adapters.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
