use relay_core::{ProviderKind, RequestError};
use thiserror::Error;

/// Unified error type for gateway operations
#[derive(Error, Debug)]
pub enum LLMError {
    #[error("model {0} not found")]
    ModelNotFound(String),

    #[error("{} API key not configured", .0.display_name())]
    ProviderNotConfigured(ProviderKind),

    #[error("provider {0} not supported")]
    UnsupportedProvider(ProviderKind),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// Non-2xx answer from the upstream; status and body are passed through
    #[error("upstream error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream request timed out")]
    Timeout,

    #[error("transform error: {0}")]
    Transform(#[from] ConversionError),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("config error: {0}")]
    Config(String),
}

impl LLMError {
    /// Map a transport failure from reqwest
    ///
    /// The URL is dropped from the message since some providers carry the key in the query.
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LLMError::Timeout
        } else {
            LLMError::Network(e.without_url().to_string())
        }
    }
}

/// Error during schema transformation
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LLMError::ModelNotFound("nope".into()).to_string(),
            "model nope not found"
        );
        assert_eq!(
            LLMError::ProviderNotConfigured(ProviderKind::OpenAi).to_string(),
            "OpenAI API key not configured"
        );
        assert_eq!(
            LLMError::Upstream { status: 429, body: "slow down".into() }.to_string(),
            "upstream error: 429 - slow down"
        );
    }

    #[test]
    fn test_conversion_error_wraps() {
        let err: LLMError = ConversionError::MissingField("choices".into()).into();
        assert!(matches!(err, LLMError::Transform(ConversionError::MissingField(_))));
    }
}
