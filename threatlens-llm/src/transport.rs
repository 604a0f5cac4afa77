//! Transport layer for the remote model API
//!
//! Defines the [`LlmTransport`] seam used by the client so protocol
//! selection and fallback logic can be exercised without a network, plus the
//! production reqwest implementation.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::types::{
    ApiErrorBody, CompletionRequest, LlmError, LlmResult, MessagesRequest, ResponseShape,
};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 600;

/// Remote call seam: one method per protocol.
///
/// Both methods decode into [`ResponseShape`] because the remote API does not
/// guarantee which shape a given endpoint returns across protocol versions.
#[async_trait]
pub trait LlmTransport: Send + Sync {
    /// Legacy single-string completion call
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<ResponseShape>;

    /// Structured multi-message call
    async fn send_messages(&self, request: &MessagesRequest) -> LlmResult<ResponseShape>;
}

/// Production transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> LlmResult<ResponseShape> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending request to model API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::classify_api_error(status.as_u16(), &text));
        }

        serde_json::from_str::<ResponseShape>(&text).map_err(|e| {
            LlmError::Decode(format!(
                "response from {} did not match any known shape: {}",
                path, e
            ))
        })
    }

    /// Parse the API's structured error body; fall back to the raw body text
    /// when the structure is absent.
    fn classify_api_error(status: u16, body: &str) -> LlmError {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => LlmError::Api {
                status,
                error_type: parsed.error.error_type,
                message: parsed.error.message,
            },
            Err(_) => LlmError::Api {
                status,
                error_type: None,
                message: body.chars().take(500).collect(),
            },
        }
    }
}

#[async_trait]
impl LlmTransport for HttpTransport {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<ResponseShape> {
        self.post_json("/v1/complete", request).await
    }

    async fn send_messages(&self, request: &MessagesRequest) -> LlmResult<ResponseShape> {
        self.post_json("/v1/messages", request).await
    }
}
