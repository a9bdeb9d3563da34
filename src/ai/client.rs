//! Completion backend client
//!
//! Wraps one rendered transcript in the fixed instruction scaffold and asks the
//! backend for a summary.

use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use serde_json::{Value, json};
use tracing::{info, warn};
use url::Url;

use super::transport::{CompletionTransport, HttpTransport, TransportConfig};
use crate::core::config::AppConfig;
use crate::errors::DigestError;
use crate::prompt::{FORMAT_INSTRUCTION, LIST_INSTRUCTION, SYSTEM_INSTRUCTION};

const MAX_TOKENS: u32 = 300;
const TOP_P: f64 = 0.1;
const BEST_OF: u32 = 1;
const PRESENCE_PENALTY: u32 = 0;

/// Coerces a request's `temp` value to a float.
///
/// Accepts JSON numbers and numeric strings.
///
/// # Errors
///
/// Returns [`DigestError::ConfigError`] for anything else, including
/// non-finite numbers.
pub fn coerce_temperature(raw: &Value) -> Result<f64, DigestError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|t| t.is_finite())
        .ok_or_else(|| DigestError::ConfigError(format!("temp must be a number, got {raw}")))
}

/// Client for the text-generation backend.
pub struct CompletionClient<T = HttpTransport> {
    transport: T,
    endpoint: Url,
    api_key: Option<String>,
    model: Option<String>,
}

impl CompletionClient<HttpTransport> {
    /// Builds a reqwest-backed client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, DigestError> {
        let transport = HttpTransport::new(&config.transport())?;
        Ok(Self::new(
            transport,
            config.completion_endpoint.clone(),
            config.completion_api_key.clone(),
            config.completion_model.clone(),
        ))
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_transport_config(
        transport: &TransportConfig,
        endpoint: Url,
        api_key: Option<String>,
    ) -> Result<Self, DigestError> {
        Ok(Self::new(HttpTransport::new(transport)?, endpoint, api_key, None))
    }
}

impl<T: CompletionTransport> CompletionClient<T> {
    #[must_use]
    pub fn new(transport: T, endpoint: Url, api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            transport,
            endpoint,
            api_key,
            model,
        }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Role-tagged instructions for one transcript, in precedence order.
    #[must_use]
    pub fn build_prompt(&self, transcript: &str, prompt: &str) -> Vec<ChatCompletionMessage> {
        [
            (MessageRole::system, SYSTEM_INSTRUCTION),
            (MessageRole::user, FORMAT_INSTRUCTION),
            (MessageRole::system, LIST_INSTRUCTION),
            (MessageRole::user, prompt),
            (MessageRole::user, transcript),
        ]
        .into_iter()
        .map(|(role, text)| ChatCompletionMessage {
            role,
            content: Content::Text(text.to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        })
        .collect()
    }

    /// Full request body: instructions plus the fixed sampling parameters.
    #[must_use]
    pub fn build_request_body(&self, prompt: &[ChatCompletionMessage], temperature: f64) -> Value {
        let mut body = json!({
            "messages": build_messages_input(prompt),
            "max_tokens": MAX_TOKENS,
            "temperature": temperature,
            "top_p": TOP_P,
            "best_of": BEST_OF,
            "presence_penalty": PRESENCE_PENALTY,
            "use_beam_search": "false",
            "ignore_eos": "false",
            "skip_special_tokens": "false",
            "logprobs": "false"
        });

        if let (Some(model), Some(map)) = (&self.model, body.as_object_mut()) {
            map.insert("model".to_string(), json!(model));
        }

        body
    }

    /// Summarises one transcript.
    ///
    /// An HTTP error status from the backend is not an error here: its decoded
    /// body is returned as the completion text so the caller can keep going.
    ///
    /// # Errors
    ///
    /// - [`DigestError::ConfigurationError`] when no credential is configured;
    ///   no request is sent in that case.
    /// - [`DigestError::HttpError`] when the request cannot be exchanged.
    /// - [`DigestError::BackendError`] when a successful reply has no
    ///   `choices[0].message.content`.
    pub async fn complete(
        &self,
        transcript: &str,
        prompt: &str,
        temperature: f64,
    ) -> Result<String, DigestError> {
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return Err(DigestError::ConfigurationError(
                "A key should be provided to invoke the endpoint".to_string(),
            ));
        };

        let instructions = self.build_prompt(transcript, prompt);

        #[cfg(feature = "debug-logs")]
        info!("Using completion prompt:\n{:?}", instructions);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            transcript_chars = transcript.chars().count(),
            instructions = instructions.len(),
            temperature,
            "Requesting completion"
        );

        let body = self.build_request_body(&instructions, temperature);
        let response = self
            .transport
            .post_json(&self.endpoint, api_key, &body)
            .await?;

        if !response.is_success() {
            warn!(
                status = response.status,
                "Completion backend returned an error status; using its body as the summary"
            );
            return Ok(response.body);
        }

        extract_content(&response.body)
    }
}

fn extract_content(body: &str) -> Result<String, DigestError> {
    let json: Value = serde_json::from_str(body).map_err(|e| {
        DigestError::BackendError(format!("Failed to parse completion response: {e}"))
    })?;

    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| {
            DigestError::BackendError("No choices[0].message.content in response".to_string())
        })
}

/// Flattens chat messages into `{role, content}` objects.
pub(crate) fn build_messages_input(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user => "user",
                MessageRole::assistant => "assistant",
                MessageRole::function => "function",
                MessageRole::tool => "tool",
            };

            let content = match &m.content {
                Content::Text(t) => json!(t),
                Content::ImageUrl(_) => Value::Null,
            };

            json!({
                "role": role_str,
                "content": content
            })
        })
        .collect()
}
