/// Role statement sent ahead of every transcript.
pub const SYSTEM_INSTRUCTION: &str = "Your role is to concisely summarise work chats.";

/// Output format the backend must follow.
pub const FORMAT_INSTRUCTION: &str = "All responses will be in valid HTML format. All dotpoints or lists will use the <ul>[list]</ul>tag. It should be in the following format:<h3>[Date Start in dd-mmm-yyyy] - [Date End in dd-mmm-yyyy]</h3><p>[Content]</p>";

/// Keeps the backend from producing lists unless the caller asks for them.
pub const LIST_INSTRUCTION: &str = "Only show dotpoint or lists if explicity asked for.";

/// Used when a library caller hands the pipeline an empty prompt.
pub const DEFAULT_SUMMARY_PROMPT: &str =
    "Summarise the below chat. List main events. List action points.";

/// Returns `prompt`, or [`DEFAULT_SUMMARY_PROMPT`] if it is blank.
#[must_use]
pub fn effective_prompt(prompt: &str) -> &str {
    if prompt.trim().is_empty() {
        DEFAULT_SUMMARY_PROMPT
    } else {
        prompt
    }
}
