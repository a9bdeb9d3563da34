//! Summarisation pipeline: directive → buckets → one completion per bucket.

use std::num::NonZeroU32;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::ai::{CompletionClient, CompletionTransport};
use crate::bucketing::{Policy, bucket_messages};
use crate::core::models::{Message, SummaryResult};
use crate::core::timestamp;
use crate::errors::DigestError;
use crate::prompt::effective_prompt;

/// Guidance returned for a directive that names no bucketing policy.
pub const INVALID_INTERVAL_MESSAGE: &str =
    "Invalid interval. Please enter either 'week', 'month' or a number of days.";

/// What a pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// One summary per bucket, in bucket first-seen order.
    Summaries(Vec<SummaryResult>),
    /// The directive was not understood; carries guidance for the caller.
    InvalidDirective(String),
}

/// Maps a directive to a bucketing policy.
///
/// `week` and `month` are matched case-insensitively; a string of ASCII digits
/// selects fixed windows of that many days. Zero and values that overflow are
/// rejected.
#[must_use]
pub fn parse_directive(directive: &str) -> Option<Policy> {
    static DAYS_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[0-9]+$").expect("static regex compile"));

    match directive.to_lowercase().as_str() {
        "week" => Some(Policy::Week),
        "month" => Some(Policy::Month),
        other if DAYS_RE.is_match(other) => other
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .map(Policy::Interval),
        _ => None,
    }
}

/// Buckets `messages` by `directive` and summarises each bucket in turn.
///
/// An unknown directive is reported as [`RunOutcome::InvalidDirective`]
/// before any bucketing or backend call happens.
///
/// # Errors
///
/// Same as [`summarise`].
#[tracing::instrument(level = "info", skip_all, fields(directive = %directive))]
pub async fn run<T: CompletionTransport>(
    client: &CompletionClient<T>,
    directive: &str,
    messages: &[Message],
    prompt: &str,
    temperature: f64,
) -> Result<RunOutcome, DigestError> {
    let Some(policy) = parse_directive(directive) else {
        info!("Rejecting unknown interval directive");
        return Ok(RunOutcome::InvalidDirective(
            INVALID_INTERVAL_MESSAGE.to_string(),
        ));
    };

    summarise(client, policy, messages, prompt, temperature).await
}

/// Buckets `messages` under an already parsed `policy` and summarises each
/// bucket in turn.
///
/// Buckets are completed one at a time in the order their keys first appear.
/// A backend error status only affects its own bucket's text; any other
/// failure aborts the run and no partial results are returned.
///
/// # Errors
///
/// Propagates fatal completion errors (missing credential, transport or
/// response parsing failures).
#[tracing::instrument(level = "info", skip_all, fields(policy = ?policy))]
pub async fn summarise<T: CompletionTransport>(
    client: &CompletionClient<T>,
    policy: Policy,
    messages: &[Message],
    prompt: &str,
    temperature: f64,
) -> Result<RunOutcome, DigestError> {
    if let Some((earliest, latest)) = timestamp::span(messages.iter().map(|m| m.date)) {
        info!(
            messages = messages.len(),
            earliest = %timestamp::format(&earliest),
            latest = %timestamp::format(&latest),
            "Bucketing transcript"
        );
    }

    let buckets = bucket_messages(messages, policy);
    info!(buckets = buckets.len(), "Transcript bucketed");

    let prompt = effective_prompt(prompt);
    let mut results = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        info!(key = %bucket.key, members = bucket.members.len(), "Summarising bucket");
        let completion = client
            .complete(&bucket.transcript, prompt, temperature)
            .await?;
        results.push(SummaryResult {
            date: bucket.key,
            completion,
        });
    }

    Ok(RunOutcome::Summaries(results))
}
