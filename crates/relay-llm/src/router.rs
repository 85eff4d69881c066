use relay_config::Config;
use std::collections::HashMap;

use crate::error::{LLMError, Result};
use crate::provider::ProviderBinding;

/// A public model id and where it is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub name: String,
    pub binding: ProviderBinding,
}

/// Maps public model ids to provider bindings
///
/// Insertion order is kept so listings are stable across calls.
#[derive(Debug, Clone, Default)]
pub struct ModelRouter {
    entries: Vec<RouteEntry>,
    index: HashMap<String, usize>,
}

impl ModelRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the model table with per-provider URL and credential settings
    pub fn from_config(config: &Config) -> Self {
        let mut router = Self::new();
        for mapping in &config.models {
            let settings = config.providers.get(mapping.provider);
            let binding = ProviderBinding::new(mapping.provider, &mapping.model, &settings.base_url)
                .with_api_key(settings.api_key());
            router.insert(&mapping.name, binding);
        }
        router
    }

    /// Add a route; an existing id keeps its position and gets the new binding
    pub fn insert(&mut self, name: impl Into<String>, binding: ProviderBinding) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&pos) => self.entries[pos].binding = binding,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(RouteEntry { name, binding });
            }
        }
    }

    /// Binding for a public model id
    pub fn resolve(&self, model: &str) -> Result<&ProviderBinding> {
        self.index
            .get(model)
            .map(|&pos| &self.entries[pos].binding)
            .ok_or_else(|| LLMError::ModelNotFound(model.to_string()))
    }

    pub fn contains(&self, model: &str) -> bool {
        self.index.contains_key(model)
    }

    /// Routes in configuration order
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
