//! Response builders for the API handler.
//!
//! Every response is an API Gateway proxy object with a string `body`.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

/// Returns a 200 OK response whose body is `payload` encoded as JSON, or a
/// 500 text response when `payload` cannot be encoded.
#[must_use]
pub fn ok_json<T: Serialize>(payload: &T) -> Value {
    let body = match serde_json::to_string(payload) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to encode response: {}", e);
            return text_response(500, "An error occurred: failed to encode response");
        }
    };
    json!({
        "statusCode": 200,
        "headers": { "Content-Type": "application/json" },
        "body": body
    })
}

/// Returns a plain-text response with the given status code.
#[must_use]
pub fn text_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "text/plain; charset=utf-8" },
        "body": message
    })
}
