use serde::{Deserialize, Serialize};

/// The body POSTed to the chat endpoint.
///
/// All three fields are always present. The initialization call sends empty
/// strings for `userMessage` and `messages`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The combined label, `"<topic> - <subtopic>"`.
    pub topic: String,

    /// The user's message, or empty for the initialization call.
    #[serde(rename = "userMessage")]
    pub user_message: String,

    /// Newline-joined prior conversation lines, each with its sender prefix.
    pub messages: String,
}

impl ChatRequest {
    /// Create a new `ChatRequest`.
    pub fn new(
        topic: impl Into<String>,
        user_message: impl Into<String>,
        messages: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            user_message: user_message.into(),
            messages: messages.into(),
        }
    }

    /// Create the request that seeds the assistant's opening line.
    pub fn initialize(topic: impl Into<String>) -> Self {
        Self::new(topic, "", "")
    }

    /// Returns true if this is an initialization request.
    pub fn is_initialize(&self) -> bool {
        self.user_message.is_empty() && self.messages.is_empty()
    }
}

/// Formats the label sent as `topic`.
pub fn topic_label(topic: &str, subtopic: &str) -> String {
    format!("{topic} - {subtopic}")
}
