//! Threatlens LLM - client adapter for the hosted model API
//!
//! Supports both the legacy single-string completion protocol and the
//! structured multi-message protocol, selecting between them at runtime and
//! falling back from legacy to messages exactly once when the remote side
//! signals a protocol mismatch.

pub mod client;
pub mod transport;
pub mod types;

pub use client::{ensure_turn_markers, strip_turn_markers, LlmClient, Protocol};
pub use transport::{HttpTransport, LlmTransport};
pub use types::{
    ChatMessage, CompletionRequest, ContentBlock, LlmConfig, LlmError, LlmResult,
    MessagesRequest, MessagesResponse, ResponseShape, Role,
};
