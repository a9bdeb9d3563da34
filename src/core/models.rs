use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp::{self, FormatError};
use crate::errors::DigestError;

/// A chat entry exactly as it appears in the RSMF `messages` array.
#[derive(Debug, Clone, Deserialize)]
pub struct RsmfMessage {
    pub date: String,
    pub sender: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    pub body: String,
}

/// A chat entry with its date parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub date: DateTime<Utc>,
    pub sender: String,
    pub recipients: Vec<String>,
    pub body: String,
}

impl TryFrom<RsmfMessage> for Message {
    type Error = FormatError;

    fn try_from(raw: RsmfMessage) -> Result<Self, Self::Error> {
        Ok(Self {
            date: timestamp::parse(&raw.date)?,
            sender: raw.sender,
            recipients: raw.recipients,
            body: raw.body,
        })
    }
}

impl Message {
    /// Parses every entry of an RSMF `messages` array, keeping input order.
    ///
    /// # Errors
    ///
    /// Fails on the first entry that has the wrong shape or a malformed date;
    /// no partial list is returned.
    pub fn parse_all(messages: &Value) -> Result<Vec<Self>, DigestError> {
        let raw: Vec<RsmfMessage> = serde_json::from_value(messages.clone())
            .map_err(|e| DigestError::InvalidInput(format!("Invalid rsmf messages: {e}")))?;

        raw.into_iter()
            .map(|m| Message::try_from(m).map_err(DigestError::from))
            .collect()
    }
}

/// Parameters of one summarisation request.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub prompt: String,
    pub interval: String,
    pub rsmf: Value,
    pub temp: Option<Value>,
}

impl SummaryRequest {
    /// Pulls the request fields out of a decoded JSON body.
    ///
    /// `prompt`, `interval` and `rsmf` must be present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::MissingParameters`] if any required field is
    /// missing, null or empty.
    pub fn from_value(body: &Value) -> Result<Self, DigestError> {
        let field = |name: &str| body.get(name).filter(|v| is_present(v));

        let (Some(prompt), Some(interval), Some(rsmf)) =
            (field("prompt"), field("interval"), field("rsmf"))
        else {
            return Err(DigestError::MissingParameters);
        };

        let (Some(prompt), Some(interval)) = (prompt.as_str(), interval.as_str()) else {
            return Err(DigestError::InvalidInput(
                "'prompt' and 'interval' must be strings".to_string(),
            ));
        };

        Ok(Self {
            prompt: prompt.to_string(),
            interval: interval.to_string(),
            rsmf: rsmf.clone(),
            temp: body.get("temp").filter(|v| !v.is_null()).cloned(),
        })
    }

    /// Parses the `rsmf.messages` array.
    ///
    /// # Errors
    ///
    /// Returns an error if `messages` is missing or any entry is malformed.
    pub fn messages(&self) -> Result<Vec<Message>, DigestError> {
        let messages = self.rsmf.get("messages").ok_or_else(|| {
            DigestError::InvalidInput("rsmf object has no 'messages' field".to_string())
        })?;
        Message::parse_all(messages)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
    }
}

/// One bucket's summary, serialised as `{"date": ..., "completion": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub date: String,
    pub completion: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_all_fields() {
        let missing_rsmf = json!({ "prompt": "p", "interval": "week" });
        assert!(matches!(
            SummaryRequest::from_value(&missing_rsmf),
            Err(DigestError::MissingParameters)
        ));

        let empty_prompt = json!({ "prompt": "", "interval": "week", "rsmf": { "messages": [] } });
        assert!(matches!(
            SummaryRequest::from_value(&empty_prompt),
            Err(DigestError::MissingParameters)
        ));

        let empty_rsmf = json!({ "prompt": "p", "interval": "week", "rsmf": {} });
        assert!(matches!(
            SummaryRequest::from_value(&empty_rsmf),
            Err(DigestError::MissingParameters)
        ));
    }

    #[test]
    fn test_from_value_keeps_optional_temp() {
        let body = json!({
            "prompt": "p",
            "interval": "month",
            "rsmf": { "messages": [] },
            "temp": 0.4
        });
        let req = SummaryRequest::from_value(&body).unwrap();
        assert_eq!(req.interval, "month");
        assert_eq!(req.temp, Some(json!(0.4)));

        let body = json!({ "prompt": "p", "interval": "7", "rsmf": { "messages": [] }, "temp": null });
        assert!(SummaryRequest::from_value(&body).unwrap().temp.is_none());
    }

    #[test]
    fn test_messages_parse_in_order() {
        let body = json!({
            "prompt": "p",
            "interval": "week",
            "rsmf": { "messages": [
                { "date": "2024-01-02T10:00:00Z", "sender": "ann", "recipients": ["bob"], "body": "hi" },
                { "date": "2024-01-01T09:00:00Z", "sender": "bob", "body": "yo" }
            ]}
        });
        let messages = SummaryRequest::from_value(&body).unwrap().messages().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, "ann");
        assert_eq!(messages[1].sender, "bob");
        assert!(messages[1].recipients.is_empty());
    }

    #[test]
    fn test_messages_bad_date_is_format_error() {
        let rsmf = json!([{ "date": "01/02/2024", "sender": "ann", "recipients": [], "body": "x" }]);
        assert!(matches!(Message::parse_all(&rsmf), Err(DigestError::Format(_))));
    }

    #[test]
    fn test_messages_wrong_shape_is_invalid_input() {
        let rsmf = json!([{ "date": "2024-01-01T00:00:00Z" }]);
        assert!(matches!(
            Message::parse_all(&rsmf),
            Err(DigestError::InvalidInput(_))
        ));
    }
}
