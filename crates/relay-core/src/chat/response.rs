use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Canonical (Ollama-shaped) chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The model id the caller asked for
    pub model: String,
    /// Creation time, seconds since the Unix epoch
    pub created: i64,
    pub message: Message,
    pub done: bool,
    #[serde(flatten)]
    pub usage: Usage,
}

impl ChatResponse {
    /// Create a completed response
    pub fn new(model: impl Into<String>, message: Message) -> Self {
        Self {
            model: model.into(),
            created: chrono::Utc::now().timestamp(),
            message,
            done: true,
            usage: Usage::default(),
        }
    }

    /// Set creation time
    pub fn with_created(mut self, created: i64) -> Self {
        self.created = created;
        self
    }

    /// Set usage
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.message.content
    }
}

/// Ollama-style usage counters
///
/// Durations are never reported by the upstream providers and stay zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub load_duration: u64,
    #[serde(default)]
    pub prompt_eval_count: u64,
    #[serde(default)]
    pub prompt_eval_duration: u64,
    #[serde(default)]
    pub eval_count: u64,
    #[serde(default)]
    pub eval_duration: u64,
}

impl Usage {
    /// Usage from upstream token counts
    pub fn from_tokens(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            prompt_eval_count: input_tokens,
            eval_count: output_tokens,
            ..Self::default()
        }
    }
}
