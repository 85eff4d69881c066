pub mod openai;
pub mod huggingface;
pub mod gemini;
pub mod anthropic;
pub mod utils;

pub use openai::OpenAiTransformer;
pub use huggingface::HuggingFaceTransformer;
pub use gemini::GeminiTransformer;
pub use anthropic::AnthropicTransformer;

use futures::Stream;
use relay_core::{ChatRequest, ChatResponse, ProviderKind, StreamChunk};
use serde_json::Value;
use std::pin::Pin;

use crate::error::ConversionError;
use crate::provider::ProviderBinding;

/// Type alias for LLM stream
pub type LLMStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, crate::LLMError>> + Send>>;

/// Schema transformer trait for converting between canonical and provider formats
///
/// Implementations are pure: they never perform I/O. `BaseProvider` owns the
/// HTTP side and calls into these.
pub trait SchemaTransformer: Send + Sync {
    /// Get the provider family
    fn kind(&self) -> ProviderKind;

    /// Whether the upstream API streams incrementally over SSE
    fn incremental_streaming(&self) -> bool {
        false
    }

    /// Full request URL
    fn endpoint(&self, binding: &ProviderBinding, api_key: &str) -> String;

    /// Provider specific authentication headers
    fn auth_headers(&self, api_key: &str) -> Vec<(&'static str, String)>;

    /// Transform request to provider-specific format
    fn transform_request(
        &self,
        binding: &ProviderBinding,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<Value, ConversionError>;

    /// Normalize a complete (non-streaming) payload
    ///
    /// `model` is the caller's model id, echoed back in the response.
    fn parse_response(&self, model: &str, data: &Value) -> Result<ChatResponse, ConversionError>;

    /// Parse the data of one SSE frame
    ///
    /// `Ok(None)` means the frame carries nothing to forward. The terminal
    /// sentinel yields a chunk with `done == true`.
    fn parse_stream_chunk(&self, _model: &str, _data: &str) -> Result<Option<StreamChunk>, ConversionError> {
        Err(ConversionError::Unsupported(format!(
            "{} does not stream incrementally",
            self.kind()
        )))
    }
}
