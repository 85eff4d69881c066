use relay_core::{ChatRequest, ChatResponse, Message, ProviderKind, Role, StreamChunk};
use serde_json::{json, Value};

use crate::error::ConversionError;
use crate::provider::ProviderBinding;
use crate::transformer::utils::{safe_get, safe_get_str, usage_at};
use crate::transformer::SchemaTransformer;

/// SSE sentinel that ends an OpenAI stream
const DONE_MARKER: &str = "[DONE]";

/// OpenAI-compatible schema transformer
/// Works with OpenAI API and compatible servers (vLLM, Ollama's /v1, ...)
pub struct OpenAiTransformer;

impl OpenAiTransformer {
    /// Create a new OpenAI transformer
    pub fn new() -> Self {
        Self
    }

    fn parse_role(role: Option<&str>) -> Role {
        match role {
            Some("system") => Role::System,
            Some("user") => Role::User,
            _ => Role::Assistant,
        }
    }
}

impl Default for OpenAiTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTransformer for OpenAiTransformer {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn incremental_streaming(&self) -> bool {
        true
    }

    fn endpoint(&self, binding: &ProviderBinding, _api_key: &str) -> String {
        format!("{}/chat/completions", binding.base_url)
    }

    fn auth_headers(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![("authorization", format!("Bearer {}", api_key))]
    }

    fn transform_request(
        &self,
        binding: &ProviderBinding,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<Value, ConversionError> {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = json!({
            "model": binding.upstream_model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "top_p": request.top_p,
        });

        if !request.stop.is_empty() {
            body["stop"] = json!(request.stop);
        }

        if stream {
            body["stream"] = json!(true);
        }

        Ok(body)
    }

    fn parse_response(&self, model: &str, data: &Value) -> Result<ChatResponse, ConversionError> {
        let choice = safe_get(data, "choices.0")
            .ok_or_else(|| ConversionError::MissingField("choices".to_string()))?;

        let role = Self::parse_role(safe_get_str(choice, "message.role"));
        let content = safe_get_str(choice, "message.content").unwrap_or_default();

        let mut response = ChatResponse::new(model, Message::new(role, content))
            .with_usage(usage_at(data, "usage.prompt_tokens", "usage.completion_tokens"));

        if let Some(created) = data["created"].as_i64() {
            response = response.with_created(created);
        }

        Ok(response)
    }

    fn parse_stream_chunk(&self, model: &str, data: &str) -> Result<Option<StreamChunk>, ConversionError> {
        // Handle SSE [DONE] marker
        if data == DONE_MARKER {
            return Ok(Some(StreamChunk::finished(model)));
        }

        let chunk: Value = serde_json::from_str(data)?;

        match safe_get_str(&chunk, "choices.0.delta.content") {
            Some(content) if !content.is_empty() => Ok(Some(StreamChunk::delta(model, content))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> ProviderBinding {
        ProviderBinding::new(ProviderKind::OpenAi, "qwen3:0.6b", "http://localhost:11434/v1")
            .with_api_key(Some("sk-test"))
    }

    #[test]
    fn test_transform_request() {
        let transformer = OpenAiTransformer::new();
        let request = ChatRequest::new("qwen3-0.6b")
            .with_message(Message::system("be brief"))
            .with_message(Message::user("Hello"))
            .temperature(0.7);

        let body = transformer.transform_request(&binding(), &request, false).unwrap();
        assert_eq!(body["model"], "qwen3:0.6b");
        let temp = body["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 0.001, "temperature should be approximately 0.7, got {}", temp);
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body.get("stop").is_none());
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_transform_request_stream_and_stop() {
        let transformer = OpenAiTransformer::new();
        let request = ChatRequest::new("m")
            .with_message(Message::user("Hello"))
            .with_stop(["\n\n"]);

        let body = transformer.transform_request(&binding(), &request, true).unwrap();
        assert_eq!(body["stream"], true);
        assert_eq!(body["stop"], json!(["\n\n"]));
    }

    #[test]
    fn test_endpoint_and_auth() {
        let transformer = OpenAiTransformer::new();
        assert_eq!(
            transformer.endpoint(&binding(), "sk-test"),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            transformer.auth_headers("sk-test"),
            vec![("authorization", "Bearer sk-test".to_string())]
        );
    }

    #[test]
    fn test_parse_response() {
        let transformer = OpenAiTransformer::new();
        let payload = json!({
            "created": 1_700_000_000,
            "choices": [{"message": {"role": "assistant", "content": "Hi"}}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 1}
        });

        let response = transformer.parse_response("gpt-4o", &payload).unwrap();
        assert_eq!(response.model, "gpt-4o");
        assert_eq!(response.created, 1_700_000_000);
        assert_eq!(response.message, Message::assistant("Hi"));
        assert!(response.done);
        assert_eq!(response.usage.prompt_eval_count, 5);
        assert_eq!(response.usage.eval_count, 1);
    }

    #[test]
    fn test_parse_response_without_choices() {
        let transformer = OpenAiTransformer::new();
        let result = transformer.parse_response("gpt-4o", &json!({"choices": []}));
        assert!(matches!(result, Err(ConversionError::MissingField(_))));
    }

    #[test]
    fn test_parse_response_null_content() {
        let transformer = OpenAiTransformer::new();
        let payload = json!({"choices": [{"message": {"role": "assistant", "content": null}}]});
        let response = transformer.parse_response("gpt-4o", &payload).unwrap();
        assert_eq!(response.text(), "");
        assert_eq!(response.usage.eval_count, 0);
    }

    #[test]
    fn test_parse_stream_chunk() {
        let transformer = OpenAiTransformer::new();

        let chunk = r#"{"choices":[{"delta":{"content":"Hello"}}]}"#;
        let result = transformer.parse_stream_chunk("gpt-4o", chunk).unwrap().unwrap();
        assert_eq!(result.message.content, "Hello");
        assert!(!result.done);

        // Role-only and empty deltas carry nothing
        let role_only = r#"{"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert!(transformer.parse_stream_chunk("gpt-4o", role_only).unwrap().is_none());
        let empty = r#"{"choices":[{"delta":{"content":""},"finish_reason":"stop"}]}"#;
        assert!(transformer.parse_stream_chunk("gpt-4o", empty).unwrap().is_none());

        let done = transformer.parse_stream_chunk("gpt-4o", "[DONE]").unwrap().unwrap();
        assert!(done.done);
        assert!(done.message.content.is_empty());
    }

    #[test]
    fn test_parse_stream_chunk_malformed() {
        let transformer = OpenAiTransformer::new();
        let result = transformer.parse_stream_chunk("gpt-4o", "{not json");
        assert!(matches!(result, Err(ConversionError::Json(_))));
    }
}
