//! API Lambda handler.
//!
//! This module handles:
//! - Request extraction (proxy body, base64 bodies, direct invocation)
//! - Required-parameter validation
//! - Temperature resolution
//! - Mapping pipeline outcomes and errors onto HTTP responses

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{helpers, parsing};
use crate::ai::{CompletionClient, CompletionTransport, coerce_temperature};
use crate::core::config::AppConfig;
use crate::core::models::SummaryRequest;
use crate::errors::DigestError;
use crate::pipeline::{self, INVALID_INTERVAL_MESSAGE, RunOutcome};

pub use self::function_handler as handler;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails: configuration problems and request-level failures all become
/// HTTP responses.
#[tracing::instrument(level = "info", skip(event), fields(request_id = %Uuid::new_v4()))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let e = DigestError::ConfigurationError(e);
            error!("Config error: {}", e);
            return Ok(helpers::text_response(
                e.status_code(),
                &format!("An error occurred: {e}"),
            ));
        }
    };
    info!("Summary request received");

    let client = match CompletionClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialise completion client: {}", e);
            return Ok(helpers::text_response(500, &format!("An error occurred: {e}")));
        }
    };

    Ok(handle_request(&client, config.default_temperature, &event.payload).await)
}

/// Runs one request end to end and builds the HTTP response.
pub async fn handle_request<T: CompletionTransport>(
    client: &CompletionClient<T>,
    default_temperature: Option<f64>,
    payload: &Value,
) -> Value {
    let body = match parsing::extract_request(payload) {
        Ok(body) => body,
        Err(e) => {
            error!("Invalid JSON format: {}", e);
            return helpers::text_response(400, "Invalid JSON format");
        }
    };

    let request = match SummaryRequest::from_value(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejecting request: {}", e);
            return helpers::text_response(400, &e.to_string());
        }
    };

    match process(client, default_temperature, &request).await {
        Ok(RunOutcome::Summaries(results)) => {
            info!(summaries = results.len(), "Summary request completed");
            helpers::ok_json(&results)
        }
        Ok(RunOutcome::InvalidDirective(message)) => helpers::ok_json(&message),
        Err(e) if e.is_client_error() => {
            warn!("Malformed request: {}", e);
            helpers::text_response(e.status_code(), &e.to_string())
        }
        Err(e) => {
            error!("An error occurred: {}", e);
            helpers::text_response(e.status_code(), &format!("An error occurred: {e}"))
        }
    }
}

async fn process<T: CompletionTransport>(
    client: &CompletionClient<T>,
    default_temperature: Option<f64>,
    request: &SummaryRequest,
) -> Result<RunOutcome, DigestError> {
    let Some(policy) = pipeline::parse_directive(&request.interval) else {
        return Ok(RunOutcome::InvalidDirective(
            INVALID_INTERVAL_MESSAGE.to_string(),
        ));
    };

    let messages = request.messages()?;
    let temperature = match &request.temp {
        Some(raw) => coerce_temperature(raw)?,
        None => default_temperature
            .filter(|t| t.is_finite())
            .ok_or_else(|| {
                DigestError::ConfigError(
                    "temp is required when no finite DEFAULT_TEMPERATURE is configured"
                        .to_string(),
                )
            })?,
    };

    pipeline::summarise(client, policy, &messages, &request.prompt, temperature)
        .await
}
