//! Parsing and formatting of RSMF message timestamps.
//!
//! Every message date travels as `YYYY-MM-DDThh:mm:ssZ` in UTC. Anything else
//! is rejected; there is no lenient fallback.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// The only accepted wire format for a message date.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Byte layout of a well-formed date: `d` is an ASCII digit, anything else
/// must match literally.
const LAYOUT: &[u8; 20] = b"dddd-dd-ddTdd:dd:ddZ";

#[derive(Debug, Error)]
#[error("Invalid message date '{input}': expected YYYY-MM-DDThh:mm:ssZ ({reason})")]
pub struct FormatError {
    pub input: String,
    pub reason: String,
    #[source]
    pub source: Option<chrono::ParseError>,
}

/// Parses a message date into a UTC instant.
///
/// Every field must be zero-padded to its full width, so a parsed date always
/// formats back to exactly `input`.
///
/// # Errors
///
/// Returns [`FormatError`] when `input` does not match [`TIMESTAMP_FORMAT`].
pub fn parse(input: &str) -> Result<DateTime<Utc>, FormatError> {
    if !has_layout(input) {
        return Err(FormatError {
            input: input.to_string(),
            reason: "fields must be zero-padded to full width".to_string(),
            source: None,
        });
    }

    NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| FormatError {
            input: input.to_string(),
            reason: source.to_string(),
            source: Some(source),
        })
}

fn has_layout(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == LAYOUT.len()
        && bytes.iter().zip(LAYOUT).all(|(&b, &want)| match want {
            b'd' => b.is_ascii_digit(),
            _ => b == want,
        })
}

/// Formats an instant back into the wire format.
#[must_use]
pub fn format(date: &DateTime<Utc>) -> String {
    date.format(TIMESTAMP_FORMAT).to_string()
}

/// Earliest and latest instants in `dates`, or `None` when empty.
pub fn span<I>(dates: I) -> Option<(DateTime<Utc>, DateTime<Utc>)>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    dates.into_iter().fold(None, |acc, date| match acc {
        None => Some((date, date)),
        Some((earliest, latest)) => Some((earliest.min(date), latest.max(date))),
    })
}
