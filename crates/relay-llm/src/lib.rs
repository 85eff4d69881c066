pub mod error;
pub mod provider;
pub mod providers;
pub mod router;
pub mod transformer;

// Re-export core types
pub use error::{ConversionError, LLMError, Result};
pub use provider::{
    build_http_client, BaseProvider, LLMProvider, ProviderBinding, ProviderCapabilities,
    ProviderMetadata,
};
pub use providers::{
    AdapterRegistry, AnthropicProvider, GeminiProvider, HuggingFaceProvider, OpenAiProvider,
};
pub use router::{ModelRouter, RouteEntry};
pub use transformer::{LLMStream, SchemaTransformer};
