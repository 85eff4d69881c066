use serde::{Deserialize, Serialize};

use crate::chat::{ChatResponse, Usage};
use crate::types::Message;

/// One element of a streamed (NDJSON) response
///
/// `message.content` carries only the delta produced since the previous
/// chunk. Every chunk but the terminal one has `done == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub model: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    pub message: Message,
    pub done: bool,
    #[serde(flatten)]
    pub usage: Usage,
}

impl StreamChunk {
    /// Create an incremental content chunk
    pub fn delta(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            created_at: now_rfc3339(),
            message: Message::assistant(text),
            done: false,
            usage: Usage::default(),
        }
    }

    /// Create the terminal chunk of an incremental stream
    pub fn finished(model: impl Into<String>) -> Self {
        Self {
            done: true,
            ..Self::delta(model, "")
        }
    }

    /// Wrap a buffered response as the single, terminal chunk of a stream
    pub fn from_response(response: ChatResponse) -> Self {
        Self {
            model: response.model,
            created_at: now_rfc3339(),
            message: response.message,
            done: true,
            usage: response.usage,
        }
    }

    /// Check if this is the terminal chunk
    pub fn is_done(&self) -> bool {
        self.done
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
