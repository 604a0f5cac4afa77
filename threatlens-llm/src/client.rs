//! LLM client with protocol selection and fallback
//!
//! The client decides between the legacy completion protocol and the
//! structured messages protocol, wraps/strips synthetic turn markers, and
//! performs the single conditional fallback from legacy to messages when the
//! remote side signals a protocol mismatch.

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::transport::{HttpTransport, LlmTransport};
use crate::types::{
    ChatMessage, CompletionRequest, LlmConfig, LlmError, LlmResult, MessagesRequest,
};

/// Model families that only speak the structured messages protocol.
/// Matched as case-insensitive substrings of the configured model id.
const MESSAGES_ONLY_FAMILIES: &[&str] = &["claude"];

const HUMAN_MARKERS: &[&str] = &["\n\nHuman:", "Human:", "\n\nSystem:", "System:"];

/// Which call convention to use against the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Single prompt string with turn markers
    LegacyCompletion,
    /// Ordered role-tagged messages
    Messages,
}

/// Client adapter over the two remote call conventions
pub struct LlmClient {
    transport: Box<dyn LlmTransport>,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a client with the production HTTP transport
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("API key must not be empty".to_string()));
        }

        let transport = HttpTransport::new(&config.base_url, &config.api_key)?;

        info!(model = %config.model, "Created LLM client");

        Ok(Self {
            transport: Box::new(transport),
            config,
        })
    }

    /// Create a client with a custom transport (used by tests)
    pub fn with_transport(config: LlmConfig, transport: Box<dyn LlmTransport>) -> Self {
        Self { transport, config }
    }

    /// Decide which protocol to use for the configured model.
    ///
    /// Models in the messages-only family, and the explicit override flag,
    /// select the structured protocol directly; everything else attempts the
    /// legacy protocol first.
    pub fn select_protocol(&self) -> Protocol {
        if self.config.force_messages || requires_messages_protocol(&self.config.model) {
            Protocol::Messages
        } else {
            Protocol::LegacyCompletion
        }
    }

    /// Generate a completion for the composed prompt.
    ///
    /// Returns the normalized response text regardless of which protocol
    /// ultimately served the call.
    pub async fn generate(&self, prompt: &str) -> LlmResult<String> {
        self.generate_with_system(None, prompt).await
    }

    /// Generate with an explicit system prompt.
    ///
    /// The structured protocol carries the system prompt as its top-level
    /// `system` parameter; the legacy protocol prefixes it before the first
    /// turn marker. The fallback path keeps the system prompt on the retry.
    pub async fn generate_with_system(
        &self,
        system: Option<&str>,
        prompt: &str,
    ) -> LlmResult<String> {
        let start = Instant::now();

        let text = match self.select_protocol() {
            Protocol::Messages => {
                debug!(model = %self.config.model, "Calling messages protocol directly");
                self.call_messages(strip_turn_markers(prompt), system).await?
            }
            Protocol::LegacyCompletion => self.call_legacy_with_fallback(prompt, system).await?,
        };

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            chars = text.len(),
            "Generation complete"
        );

        Ok(text)
    }

    /// Legacy call, retried once via messages on protocol mismatch
    async fn call_legacy_with_fallback(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> LlmResult<String> {
        let wrapped = ensure_turn_markers(prompt);
        let final_prompt = match system {
            Some(system) => format!("{}{}", system, wrapped),
            None => wrapped,
        };

        debug!(model = %self.config.model, "Calling legacy completion protocol");

        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt: final_prompt,
            max_tokens_to_sample: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        match self.transport.complete(&request).await {
            Ok(response) => response.into_text(),
            Err(primary) if primary.is_protocol_mismatch() => {
                warn!(
                    error = %primary,
                    "Legacy protocol rejected for this model, retrying via messages"
                );

                let inner = strip_turn_markers(prompt);
                match self.call_messages(inner, system).await {
                    Ok(text) => Ok(text),
                    Err(fallback) => Err(LlmError::FallbackFailed {
                        primary: Box::new(primary),
                        fallback: Box::new(fallback),
                    }),
                }
            }
            Err(other) => Err(other),
        }
    }

    async fn call_messages(&self, content: String, system: Option<&str>) -> LlmResult<String> {
        let request = MessagesRequest {
            model: self.config.model.clone(),
            system: system.map(str::to_string),
            messages: vec![ChatMessage::user(content)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self.transport.send_messages(&request).await?;
        response.into_text()
    }

    /// Get the current configuration
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

fn requires_messages_protocol(model: &str) -> bool {
    let model = model.to_lowercase();
    MESSAGES_ONLY_FAMILIES
        .iter()
        .any(|family| model.contains(family))
}

/// Ensure the prompt carries the turn markers the legacy protocol requires.
///
/// A prompt that does not already open with a Human/System marker is wrapped
/// with a synthetic human turn and a trailing assistant turn.
pub fn ensure_turn_markers(prompt: &str) -> String {
    if HUMAN_MARKERS
        .iter()
        .any(|marker| prompt.starts_with(marker))
    {
        prompt.to_string()
    } else {
        format!("\n\nHuman: {}\n\nAssistant:", prompt)
    }
}

/// Strip the synthetic turn markers back out, leaving the inner content that
/// the structured protocol sends as a single user message.
pub fn strip_turn_markers(prompt: &str) -> String {
    let mut inner = prompt;

    for prefix in ["\n\nHuman: ", "Human: ", "\n\nHuman:", "Human:"] {
        if let Some(rest) = inner.strip_prefix(prefix) {
            inner = rest;
            break;
        }
    }

    for suffix in ["\n\nAssistant:", "Assistant:"] {
        if let Some(rest) = inner.strip_suffix(suffix) {
            inner = rest;
            break;
        }
    }

    inner.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompletionResponse, ContentBlock, MessagesResponse, ResponseShape};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn test_config(model: &str, force_messages: bool) -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".to_string(),
            model: model.to_string(),
            base_url: "https://api.example.com".to_string(),
            temperature: 0.0,
            max_tokens: 16000,
            force_messages,
        }
    }

    fn messages_shape(parts: &[&str]) -> ResponseShape {
        ResponseShape::Messages(MessagesResponse {
            content: parts.iter().map(|p| ContentBlock::text(*p)).collect(),
            stop_reason: Some("end_turn".to_string()),
            model: None,
        })
    }

    fn legacy_shape(text: &str) -> ResponseShape {
        ResponseShape::Legacy(CompletionResponse {
            completion: text.to_string(),
            stop_reason: Some("stop_sequence".to_string()),
        })
    }

    fn mismatch_error() -> LlmError {
        LlmError::Api {
            status: 400,
            error_type: Some("invalid_request_error".to_string()),
            message: "This model is not supported here. Please use the Messages API.".to_string(),
        }
    }

    /// Scripted transport recording every request it receives
    struct MockTransport {
        complete_result: Mutex<Option<LlmResult<ResponseShape>>>,
        messages_result: Mutex<Option<LlmResult<ResponseShape>>>,
        complete_calls: Mutex<Vec<CompletionRequest>>,
        messages_calls: Mutex<Vec<MessagesRequest>>,
    }

    impl MockTransport {
        fn new(
            complete_result: Option<LlmResult<ResponseShape>>,
            messages_result: Option<LlmResult<ResponseShape>>,
        ) -> Self {
            Self {
                complete_result: Mutex::new(complete_result),
                messages_result: Mutex::new(messages_result),
                complete_calls: Mutex::new(Vec::new()),
                messages_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmTransport for MockTransport {
        async fn complete(&self, request: &CompletionRequest) -> LlmResult<ResponseShape> {
            self.complete_calls.lock().unwrap().push(request.clone());
            self.complete_result
                .lock()
                .unwrap()
                .take()
                .expect("unexpected legacy call")
        }

        async fn send_messages(&self, request: &MessagesRequest) -> LlmResult<ResponseShape> {
            self.messages_calls.lock().unwrap().push(request.clone());
            self.messages_result
                .lock()
                .unwrap()
                .take()
                .expect("unexpected messages call")
        }
    }

    fn client_with(
        config: LlmConfig,
        transport: MockTransport,
    ) -> (LlmClient, std::sync::Arc<MockTransport>) {
        let transport = std::sync::Arc::new(transport);

        struct Shared(std::sync::Arc<MockTransport>);

        #[async_trait]
        impl LlmTransport for Shared {
            async fn complete(&self, request: &CompletionRequest) -> LlmResult<ResponseShape> {
                self.0.complete(request).await
            }
            async fn send_messages(&self, request: &MessagesRequest) -> LlmResult<ResponseShape> {
                self.0.send_messages(request).await
            }
        }

        let client = LlmClient::with_transport(config, Box::new(Shared(transport.clone())));
        (client, transport)
    }

    #[test]
    fn test_protocol_selection_for_claude_models() {
        let (client, _) = client_with(
            test_config("claude-sonnet-4-20250514", false),
            MockTransport::new(None, None),
        );
        assert_eq!(client.select_protocol(), Protocol::Messages);

        let (client, _) = client_with(
            test_config("CLAUDE-OPUS-TEST", false),
            MockTransport::new(None, None),
        );
        assert_eq!(client.select_protocol(), Protocol::Messages);
    }

    #[test]
    fn test_protocol_selection_for_other_models() {
        let (client, _) = client_with(
            test_config("legacy-completion-model", false),
            MockTransport::new(None, None),
        );
        assert_eq!(client.select_protocol(), Protocol::LegacyCompletion);
    }

    #[test]
    fn test_force_messages_override() {
        let (client, _) = client_with(
            test_config("legacy-completion-model", true),
            MockTransport::new(None, None),
        );
        assert_eq!(client.select_protocol(), Protocol::Messages);
    }

    #[tokio::test]
    async fn test_claude_model_never_attempts_legacy() {
        let (client, transport) = client_with(
            test_config("claude-sonnet-4-20250514", false),
            MockTransport::new(None, Some(Ok(messages_shape(&["# EXECUTIVE SUMMARY"])))),
        );

        let text = client.generate("Assess this project.").await.unwrap();

        assert_eq!(text, "# EXECUTIVE SUMMARY");
        assert!(transport.complete_calls.lock().unwrap().is_empty());
        assert_eq!(transport.messages_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_legacy_success_needs_no_fallback() {
        let (client, transport) = client_with(
            test_config("legacy-completion-model", false),
            MockTransport::new(Some(Ok(legacy_shape("report text"))), None),
        );

        let text = client.generate("Assess this project.").await.unwrap();

        assert_eq!(text, "report text");
        assert_eq!(transport.complete_calls.lock().unwrap().len(), 1);
        assert!(transport.messages_calls.lock().unwrap().is_empty());

        // The legacy call carried the synthetic turn markers
        let sent = &transport.complete_calls.lock().unwrap()[0];
        assert!(sent.prompt.starts_with("\n\nHuman: "));
        assert!(sent.prompt.ends_with("\n\nAssistant:"));
    }

    #[tokio::test]
    async fn test_protocol_mismatch_falls_back_once_with_inner_content() {
        let (client, transport) = client_with(
            test_config("legacy-completion-model", false),
            MockTransport::new(
                Some(Err(mismatch_error())),
                Some(Ok(messages_shape(&["Hello ", "world"]))),
            ),
        );

        let text = client.generate("Assess this project.").await.unwrap();

        assert_eq!(text, "Hello world");
        assert_eq!(transport.complete_calls.lock().unwrap().len(), 1);

        let messages_calls = transport.messages_calls.lock().unwrap();
        assert_eq!(messages_calls.len(), 1);
        // Synthetic turn markers must be stripped back out
        assert_eq!(messages_calls[0].messages.len(), 1);
        assert_eq!(messages_calls[0].messages[0].content, "Assess this project.");
    }

    #[tokio::test]
    async fn test_non_mismatch_error_propagates_without_fallback() {
        let rate_limited = LlmError::Api {
            status: 429,
            error_type: Some("rate_limit_error".to_string()),
            message: "Too many requests".to_string(),
        };

        let (client, transport) = client_with(
            test_config("legacy-completion-model", false),
            MockTransport::new(Some(Err(rate_limited)), None),
        );

        let err = client.generate("Assess this project.").await.unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 429, .. }));
        assert!(transport.messages_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_double_failure_preserves_both_errors() {
        let fallback_err = LlmError::Api {
            status: 500,
            error_type: Some("api_error".to_string()),
            message: "Internal server error".to_string(),
        };

        let (client, _) = client_with(
            test_config("legacy-completion-model", false),
            MockTransport::new(Some(Err(mismatch_error())), Some(Err(fallback_err))),
        );

        let err = client.generate("Assess this project.").await.unwrap_err();

        match &err {
            LlmError::FallbackFailed { primary, .. } => {
                assert!(primary.is_protocol_mismatch());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            err.fallback_cause(),
            Some(LlmError::Api { status: 500, .. })
        ));
        // Display leads with the root cause
        assert!(err.to_string().starts_with("API error (400)"));
    }

    #[tokio::test]
    async fn test_system_prompt_rides_messages_request() {
        let (client, transport) = client_with(
            test_config("claude-sonnet-4-20250514", false),
            MockTransport::new(None, Some(Ok(messages_shape(&["ok"])))),
        );

        client
            .generate_with_system(Some("You are a consultant."), "Assess this project.")
            .await
            .unwrap();

        let calls = transport.messages_calls.lock().unwrap();
        assert_eq!(calls[0].system.as_deref(), Some("You are a consultant."));
        assert_eq!(calls[0].messages[0].content, "Assess this project.");
    }

    #[tokio::test]
    async fn test_system_prompt_prefixes_legacy_and_survives_fallback() {
        let (client, transport) = client_with(
            test_config("legacy-completion-model", false),
            MockTransport::new(
                Some(Err(mismatch_error())),
                Some(Ok(messages_shape(&["ok"]))),
            ),
        );

        client
            .generate_with_system(Some("Persona."), "Assess this project.")
            .await
            .unwrap();

        // Legacy carries the system text ahead of the first turn marker
        let sent = &transport.complete_calls.lock().unwrap()[0];
        assert!(sent.prompt.starts_with("Persona.\n\nHuman: Assess this project."));

        // The retry keeps the system prompt as the structured parameter,
        // never folded into the user message
        let messages = transport.messages_calls.lock().unwrap();
        assert_eq!(messages[0].system.as_deref(), Some("Persona."));
        assert_eq!(messages[0].messages[0].content, "Assess this project.");
    }

    #[tokio::test]
    async fn test_no_system_prompt_omits_the_field() {
        let (client, transport) = client_with(
            test_config("claude-sonnet-4-20250514", false),
            MockTransport::new(None, Some(Ok(messages_shape(&["ok"])))),
        );

        client.generate("Assess this project.").await.unwrap();

        let calls = transport.messages_calls.lock().unwrap();
        assert!(calls[0].system.is_none());
    }

    #[test]
    fn test_ensure_turn_markers_wraps_bare_prompts() {
        let wrapped = ensure_turn_markers("do the thing");
        assert_eq!(wrapped, "\n\nHuman: do the thing\n\nAssistant:");

        // Already-marked prompts pass through untouched
        let marked = "\n\nHuman: already marked\n\nAssistant:";
        assert_eq!(ensure_turn_markers(marked), marked);
        assert_eq!(ensure_turn_markers("System: setup"), "System: setup");
    }

    #[test]
    fn test_strip_turn_markers_roundtrip() {
        let original = "Assess this project.\nWith two lines.";
        let stripped = strip_turn_markers(&ensure_turn_markers(original));
        assert_eq!(stripped, original);

        // Unmarked prompts are unchanged
        assert_eq!(strip_turn_markers(original), original);
    }
}
