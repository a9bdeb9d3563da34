use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::errors::DigestError;

/// Extracts the request object from a Lambda event.
///
/// API Gateway proxy events carry it as a JSON string in `body`, base64
/// encoded when `isBase64Encoded` is set. Any other payload is taken to be a
/// direct invocation and is the request itself.
///
/// # Errors
///
/// Returns [`DigestError::InvalidInput`] if the body is not valid JSON.
pub fn extract_request(payload: &Value) -> Result<Value, DigestError> {
    let Some(body) = payload.get("body") else {
        return Ok(payload.clone());
    };

    match body {
        Value::String(raw) => {
            let decoded = if is_base64_encoded(payload) {
                let bytes = STANDARD.decode(raw.trim()).map_err(|e| {
                    DigestError::InvalidInput(format!("Failed to decode base64 body: {e}"))
                })?;
                String::from_utf8(bytes)
                    .map_err(|e| DigestError::InvalidInput(format!("Body is not UTF-8: {e}")))?
            } else {
                raw.clone()
            };
            Ok(serde_json::from_str(&decoded)?)
        }
        Value::Object(_) => Ok(body.clone()),
        Value::Null => Ok(Value::Null),
        _ => Err(DigestError::InvalidInput("Invalid body format".to_string())),
    }
}

fn is_base64_encoded(payload: &Value) -> bool {
    payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
