use relay_core::ProviderKind;

use crate::error::{LLMError, Result};

/// Where a model id is served from
///
/// Built once at startup from configuration and never modified afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderBinding {
    pub kind: ProviderKind,
    /// The provider's own model identifier
    pub upstream_model: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ProviderBinding {
    pub fn new(
        kind: ProviderKind,
        upstream_model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            upstream_model: upstream_model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Set API key; blank keys are treated as absent
    pub fn with_api_key(mut self, key: Option<impl Into<String>>) -> Self {
        self.api_key = key.map(Into::into).filter(|k: &String| !k.trim().is_empty());
        self
    }

    /// The API key, or `ProviderNotConfigured` when none is set
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(LLMError::ProviderNotConfigured(self.kind))
    }
}

// Keep credentials out of logs
impl std::fmt::Debug for ProviderBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderBinding")
            .field("kind", &self.kind)
            .field("upstream_model", &self.upstream_model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
