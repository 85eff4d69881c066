use relay_core::{ChatRequest, ChatResponse, Message, ProviderKind};
use serde::Serialize;
use serde_json::Value;

use crate::error::ConversionError;
use crate::provider::ProviderBinding;
use crate::transformer::utils::{safe_get_str, usage_at};
use crate::transformer::SchemaTransformer;

/// Anthropic Messages API version sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    pub messages: Vec<AnthropicMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<&'a [String]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnthropicMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Anthropic Messages API transformer
///
/// System prompts are not part of the message list on this API: the first
/// system message becomes the top-level `system` field and every system
/// message is dropped from `messages`.
pub struct AnthropicTransformer;

impl AnthropicTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnthropicTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTransformer for AnthropicTransformer {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn endpoint(&self, binding: &ProviderBinding, _api_key: &str) -> String {
        format!("{}/messages", binding.base_url)
    }

    fn auth_headers(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("x-api-key", api_key.to_string()),
            ("anthropic-version", ANTHROPIC_VERSION.to_string()),
        ]
    }

    fn transform_request(
        &self,
        binding: &ProviderBinding,
        request: &ChatRequest,
        _stream: bool,
    ) -> Result<Value, ConversionError> {
        let messages = request
            .messages
            .iter()
            .filter(|m| !m.is_system())
            .map(|m| AnthropicMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        let body = MessagesRequest {
            model: &binding.upstream_model,
            system: request.first_system_message().map(|m| m.content.as_str()),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stop_sequences: (!request.stop.is_empty()).then_some(request.stop.as_slice()),
        };

        Ok(serde_json::to_value(body)?)
    }

    fn parse_response(&self, model: &str, data: &Value) -> Result<ChatResponse, ConversionError> {
        // First block only; a missing block or text field reads as empty
        let text = safe_get_str(data, "content.0.text").unwrap_or_default();
        let usage = usage_at(data, "usage.input_tokens", "usage.output_tokens");

        Ok(ChatResponse::new(model, Message::assistant(text)).with_usage(usage))
    }
}
