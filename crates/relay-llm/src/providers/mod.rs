pub mod registry;

pub use registry::AdapterRegistry;

use crate::provider::BaseProvider;
use crate::transformer::{
    AnthropicTransformer, GeminiTransformer, HuggingFaceTransformer, OpenAiTransformer,
};

/// OpenAI chat completions, streams incrementally over SSE
pub type OpenAiProvider = BaseProvider<OpenAiTransformer>;

/// HuggingFace Inference API
pub type HuggingFaceProvider = BaseProvider<HuggingFaceTransformer>;

/// Google Gemini
pub type GeminiProvider = BaseProvider<GeminiTransformer>;

/// Anthropic Messages API
pub type AnthropicProvider = BaseProvider<AnthropicTransformer>;
