pub mod base;
pub mod binding;
pub mod metadata;

pub use base::{build_http_client, BaseProvider};
pub use binding::ProviderBinding;
pub use metadata::{LLMProvider, ProviderCapabilities, ProviderMetadata};
