use relay_core::{ChatRequest, ChatResponse, Message, ProviderKind, Role};
use serde_json::{json, Value};

use crate::error::ConversionError;
use crate::provider::ProviderBinding;
use crate::transformer::utils::{safe_get_str, usage_at};
use crate::transformer::SchemaTransformer;

/// Google Gemini `generateContent` transformer
pub struct GeminiTransformer;

impl GeminiTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Gemini only knows "user" and "model" roles
    fn convert_role(role: Role) -> &'static str {
        match role {
            Role::Assistant => "model",
            Role::User | Role::System => "user",
        }
    }
}

impl Default for GeminiTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTransformer for GeminiTransformer {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    /// The key travels as a query parameter
    fn endpoint(&self, binding: &ProviderBinding, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            binding.base_url, binding.upstream_model, api_key
        )
    }

    fn auth_headers(&self, _api_key: &str) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn transform_request(
        &self,
        _binding: &ProviderBinding,
        request: &ChatRequest,
        _stream: bool,
    ) -> Result<Value, ConversionError> {
        let contents: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                json!({
                    "role": Self::convert_role(m.role),
                    "parts": [{ "text": m.content }],
                })
            })
            .collect();

        let mut generation_config = json!({
            "temperature": request.temperature,
            "topP": request.top_p,
            "maxOutputTokens": request.max_tokens,
        });

        if !request.stop.is_empty() {
            generation_config["stopSequences"] = json!(request.stop);
        }

        Ok(json!({
            "contents": contents,
            "generationConfig": generation_config,
        }))
    }

    fn parse_response(&self, model: &str, data: &Value) -> Result<ChatResponse, ConversionError> {
        let text = safe_get_str(data, "candidates.0.content.parts.0.text")
            .ok_or_else(|| ConversionError::MissingField("candidates[0].content.parts[0].text".to_string()))?;

        Ok(ChatResponse::new(model, Message::assistant(text)).with_usage(usage_at(
            data,
            "usageMetadata.promptTokenCount",
            "usageMetadata.candidatesTokenCount",
        )))
    }
}
