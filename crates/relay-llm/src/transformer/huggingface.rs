use relay_core::{ChatRequest, ChatResponse, Message, ProviderKind, Role};
use serde_json::{json, Value};

use crate::error::ConversionError;
use crate::provider::ProviderBinding;
use crate::transformer::utils::safe_get_str;
use crate::transformer::SchemaTransformer;

/// HuggingFace Inference API transformer
///
/// The text-generation endpoint takes one prompt string, so the conversation
/// is flattened into role-prefixed turns ending with an open `Assistant:`.
pub struct HuggingFaceTransformer;

impl HuggingFaceTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Flatten the conversation into a single prompt
    pub fn build_prompt(messages: &[Message]) -> String {
        let mut conversation = String::new();
        for msg in messages {
            match msg.role {
                Role::User => {
                    conversation.push_str(&format!("User: {}\nAssistant:", msg.content));
                }
                Role::Assistant => {
                    conversation.push_str(&format!("{}\n", msg.content));
                }
                Role::System => {
                    conversation.push_str(&format!("System: {}\n", msg.content));
                }
            }
        }
        conversation
    }
}

impl Default for HuggingFaceTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTransformer for HuggingFaceTransformer {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn endpoint(&self, binding: &ProviderBinding, _api_key: &str) -> String {
        format!("{}/{}", binding.base_url, binding.upstream_model)
    }

    fn auth_headers(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![("authorization", format!("Bearer {}", api_key))]
    }

    // Stop sequences are not uniformly supported across hosted models and are not forwarded
    fn transform_request(
        &self,
        _binding: &ProviderBinding,
        request: &ChatRequest,
        _stream: bool,
    ) -> Result<Value, ConversionError> {
        Ok(json!({
            "inputs": Self::build_prompt(&request.messages),
            "parameters": {
                "max_new_tokens": request.max_tokens,
                "temperature": request.temperature,
                "top_p": request.top_p,
                "return_full_text": false,
            }
        }))
    }

    fn parse_response(&self, model: &str, data: &Value) -> Result<ChatResponse, ConversionError> {
        let text = if data.is_array() {
            safe_get_str(data, "0.generated_text").unwrap_or_default()
        } else {
            ""
        };

        Ok(ChatResponse::new(model, Message::assistant(text)))
    }
}
