#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use rsmf_digest::ai::{CompletionClient, CompletionTransport, TransportResponse};
use rsmf_digest::core::models::Message;
use rsmf_digest::core::timestamp;
use rsmf_digest::errors::DigestError;
use serde_json::{Value, json};
use url::Url;

/// Scripted stand-in for the completion backend that records every request.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<Result<TransportResponse, DigestError>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl FakeTransport {
    pub fn with_replies(replies: Vec<Result<TransportResponse, DigestError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    /// The transcript (last user turn) of each recorded request.
    pub fn transcripts(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|(_, body)| {
                body["messages"]
                    .as_array()
                    .and_then(|m| m.last())
                    .and_then(|m| m["content"].as_str())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }
}

#[async_trait]
impl CompletionTransport for FakeTransport {
    async fn post_json(
        &self,
        _url: &Url,
        bearer: &str,
        body: &Value,
    ) -> Result<TransportResponse, DigestError> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push((bearer.to_string(), body.clone()));
            requests.len()
        };

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(completion(&format!("summary {n}"))))
    }
}

/// A 200 reply carrying `content` as the first choice.
pub fn completion(content: &str) -> TransportResponse {
    TransportResponse {
        status: 200,
        body: json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string(),
    }
}

pub fn status(status: u16, body: &str) -> TransportResponse {
    TransportResponse {
        status,
        body: body.to_string(),
    }
}

pub fn client(transport: FakeTransport) -> CompletionClient<FakeTransport> {
    CompletionClient::new(
        transport,
        Url::parse("https://llm.example.com/v1/chat/completions").unwrap(),
        Some("secret".to_string()),
        None,
    )
}

pub fn client_without_key(transport: FakeTransport) -> CompletionClient<FakeTransport> {
    CompletionClient::new(
        transport,
        Url::parse("https://llm.example.com/v1/chat/completions").unwrap(),
        None,
        None,
    )
}

pub fn message(date: &str, sender: &str, recipients: &[&str], body: &str) -> Message {
    Message {
        date: timestamp::parse(date).unwrap(),
        sender: sender.to_string(),
        recipients: recipients.iter().map(ToString::to_string).collect(),
        body: body.to_string(),
    }
}
