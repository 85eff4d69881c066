use crate::types::Message;

/// Canonical chat request, independent of any upstream wire format
///
/// Sampling parameters are always concrete here: the HTTP layer resolves
/// caller values against configured defaults before building one.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Externally visible model id, resolved by the model router
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    /// Stop sequences, duplicates removed, first occurrence order kept
    pub stop: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("messages must not be empty")]
    EmptyMessages,

    #[error("model must not be empty")]
    EmptyModel,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            stream: false,
            temperature: 0.8,
            max_tokens: 1024,
            top_p: 0.9,
            stop: Vec::new(),
        }
    }

    /// Add a message to the request
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add multiple messages
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Enable or disable streaming
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Set top_p
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Set stop sequences
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop.clear();
        for seq in stop {
            let seq = seq.into();
            if !self.stop.contains(&seq) {
                self.stop.push(seq);
            }
        }
        self
    }

    /// Check the request invariants
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.model.trim().is_empty() {
            return Err(RequestError::EmptyModel);
        }
        if self.messages.is_empty() {
            return Err(RequestError::EmptyMessages);
        }
        Ok(())
    }

    /// The first system message, if any
    pub fn first_system_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_system())
    }
}
