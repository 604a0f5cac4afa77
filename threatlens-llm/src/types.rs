//! Type definitions for the LLM client adapter
//!
//! Wire-level request/response types for both call conventions, plus the
//! adapter's error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use threatlens_core::{ErrorContext, LlmSettings, ThreatlensError};

/// Configuration for the LLM client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the hosted model API
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Base URL of the API endpoint
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Token budget for the response
    pub max_tokens: u32,
    /// Force the structured messages protocol regardless of model family
    pub force_messages: bool,
}

impl LlmConfig {
    /// Build an operational config from the shared settings plus the API key
    /// collected from the presentation layer.
    pub fn from_settings(settings: &LlmSettings, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: settings.model.clone(),
            base_url: settings.base_url.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            force_messages: settings.force_messages,
        }
    }
}

/// Legacy completion request: one prompt string with embedded turn markers
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens_to_sample: u32,
    pub temperature: f32,
}

/// Structured messages request: an ordered list of role-tagged messages with
/// an optional top-level system prompt
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// One message in the structured protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Known response shapes across protocol versions.
///
/// The remote API does not contractually guarantee one shape to the caller,
/// so decoding is an exhaustive sum over the shapes each protocol version is
/// known to return; anything else is a decode error rather than a silent
/// stringification.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResponseShape {
    /// Structured protocol: ordered content blocks
    Messages(MessagesResponse),
    /// Legacy protocol: a single completion string
    Legacy(CompletionResponse),
}

impl ResponseShape {
    /// Normalize a response into its text content.
    ///
    /// Content blocks are concatenated in order; blocks without a text field
    /// (tool use, images) are skipped.
    pub fn into_text(self) -> LlmResult<String> {
        match self {
            ResponseShape::Messages(response) => {
                let text: String = response
                    .content
                    .iter()
                    .filter_map(|block| block.text.as_deref())
                    .collect();
                if text.is_empty() {
                    Err(LlmError::Decode(
                        "messages response contained no text blocks".to_string(),
                    ))
                } else {
                    Ok(text)
                }
            }
            ResponseShape::Legacy(response) => Ok(response.completion),
        }
    }
}

/// Structured protocol response body
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// One unit of a structured response's content sequence
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub block_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            block_type: Some("text".to_string()),
            text: Some(text.into()),
        }
    }
}

/// Legacy protocol response body
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub completion: String,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Error body returned by the remote API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    pub message: String,
}

/// Errors produced by the LLM client adapter
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        error_type: Option<String>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unrecognized response shape: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Both the legacy call and the one-shot messages fallback failed. The
    /// primary (legacy) error is the root cause shown to the user; the
    /// fallback error is preserved rather than discarded.
    #[error("{primary} (messages fallback also failed: {fallback})")]
    FallbackFailed {
        primary: Box<LlmError>,
        fallback: Box<LlmError>,
    },
}

pub type LlmResult<T> = Result<T, LlmError>;

impl LlmError {
    /// Whether this error signals that the legacy completion protocol is not
    /// supported for the configured model.
    ///
    /// Prefers the structured error type returned by the API; matching on the
    /// human-readable message is a fallback heuristic only, kept for gateways
    /// that omit the structured type.
    pub fn is_protocol_mismatch(&self) -> bool {
        match self {
            LlmError::Api {
                error_type,
                message,
                ..
            } => {
                let lower = message.to_lowercase();
                if error_type.as_deref() == Some("invalid_request_error")
                    && lower.contains("messages")
                {
                    return true;
                }
                // Fallback heuristic: message-substring classification
                lower.contains("messages api")
            }
            _ => false,
        }
    }

    /// The underlying fallback error, when both call attempts failed
    pub fn fallback_cause(&self) -> Option<&LlmError> {
        match self {
            LlmError::FallbackFailed { fallback, .. } => Some(fallback),
            _ => None,
        }
    }
}

impl From<LlmError> for ThreatlensError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Network(message) => ThreatlensError::Network {
                message,
                source: None,
                context: ErrorContext::new("llm")
                    .with_suggestion("Check network connectivity and the API base URL"),
            },
            other => ThreatlensError::Llm {
                message: other.to_string(),
                model: None,
                context: ErrorContext::new("llm")
                    .with_suggestion("Verify the API key and model identifier"),
            },
        }
    }
}
