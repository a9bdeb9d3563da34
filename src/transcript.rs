//! Flat text rendering of one bucket, as submitted to the completion backend.

use crate::core::models::Message;
use crate::core::timestamp;

/// Renders a bucket header followed by one line per message.
///
/// The header reads `"{label} starting on {key}:"`; each message adds
/// `"\n  {date} - {sender} to {recipients}: {body}"`. Bodies are passed through
/// verbatim, newlines included.
#[must_use]
pub fn render(label: &str, key: &str, members: &[&Message]) -> String {
    let mut text = format!("{label} starting on {key}:");
    for message in members {
        text.push_str(&render_line(message));
    }
    text
}

fn render_line(message: &Message) -> String {
    format!(
        "\n  {} - {} to {}: {}",
        timestamp::format(&message.date),
        message.sender,
        message.recipients.join(", "),
        message.body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(date: &str, sender: &str, recipients: &[&str], body: &str) -> Message {
        Message {
            date: timestamp::parse(date).unwrap(),
            sender: sender.to_string(),
            recipients: recipients.iter().map(ToString::to_string).collect(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_render_header_and_lines() {
        let a = message("2024-01-01T10:00:00Z", "ann", &["bob", "cat"], "standup moved");
        let b = message("2024-01-02T11:30:00Z", "bob", &["ann"], "ok");
        let text = render("Week", "2024-01-01", &[&a, &b]);

        assert_eq!(
            text,
            "Week starting on 2024-01-01:\
             \n  2024-01-01T10:00:00Z - ann to bob, cat: standup moved\
             \n  2024-01-02T11:30:00Z - bob to ann: ok"
        );
    }

    #[test]
    fn test_render_empty_recipients_and_multiline_body() {
        let a = message("2024-05-05T00:00:00Z", "ann", &[], "line one\nline two");
        let text = render("Period", "2024-05-01", &[&a]);
        assert_eq!(
            text,
            "Period starting on 2024-05-01:\n  2024-05-05T00:00:00Z - ann to : line one\nline two"
        );
    }

    #[test]
    fn test_render_repeats_input_dates_verbatim() {
        let raw = "2024-01-05T01:02:03Z";
        let a = message(raw, "ann", &["bob"], "hi");
        let text = render("Week", "2024-01-01", &[&a]);
        assert!(text.contains(&format!("  {raw} - ann to bob: hi")));
    }
}
