use std::fmt;

use serde::{Deserialize, Serialize};

/// Who authored a line of the conversation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Typed by the learner.
    User,

    /// Returned by the chat endpoint.
    Assistant,

    /// Local announcement, such as the chosen scenario.
    SystemNotice,

    /// The assistant's response was unavailable.
    Error,
}

impl Sender {
    /// The prefix shown before the text in display form.
    pub fn prefix(self) -> &'static str {
        match self {
            Sender::User => "🧑: ",
            Sender::Assistant => "🤖: ",
            Sender::SystemNotice => "",
            Sender::Error => "❌ ",
        }
    }

    /// Returns true if lines from this sender are sent back as context.
    pub fn is_conversational(self) -> bool {
        matches!(self, Sender::User | Sender::Assistant)
    }
}

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The author of the line.
    pub sender: Sender,

    /// The untagged text.
    pub text: String,
}

impl HistoryEntry {
    /// Create a new `HistoryEntry`.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    /// Create a user entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create an assistant entry.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// Create a local notice.
    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(Sender::SystemNotice, text)
    }

    /// Create an error entry.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Sender::Error, text)
    }

    /// The line as displayed and as sent in the history string.
    pub fn display_line(&self) -> String {
        format!("{}{}", self.sender.prefix(), self.text)
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sender.prefix(), self.text)
    }
}

/// Serializes the conversational lines of `entries` for the `messages` field.
///
/// Notices and errors are dropped structurally, so text that happens to begin
/// with a sender glyph is never misclassified.
pub fn history_string(entries: &[HistoryEntry]) -> String {
    entries
        .iter()
        .filter(|entry| entry.sender.is_conversational())
        .map(HistoryEntry::display_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lines() {
        assert_eq!(HistoryEntry::user("hi").display_line(), "🧑: hi");
        assert_eq!(HistoryEntry::assistant("hello").display_line(), "🤖: hello");
        assert_eq!(
            HistoryEntry::notice("You selected: A - a").to_string(),
            "You selected: A - a"
        );
        assert_eq!(HistoryEntry::error("oops").to_string(), "❌ oops");
    }

    #[test]
    fn history_string_keeps_only_conversation() {
        let entries = vec![
            HistoryEntry::notice("You selected: TopicA - SubA"),
            HistoryEntry::assistant("Welcome"),
            HistoryEntry::error("unavailable"),
            HistoryEntry::user("hi"),
        ];
        assert_eq!(history_string(&entries), "🤖: Welcome\n🧑: hi");
    }

    #[test]
    fn notice_that_looks_like_a_reply_is_not_sent() {
        let entries = vec![
            HistoryEntry::notice("🤖: not really the assistant"),
            HistoryEntry::user("🤖: typed by the user"),
        ];
        assert_eq!(history_string(&entries), "🧑: 🤖: typed by the user");
    }

    #[test]
    fn empty_history_is_empty_string() {
        assert_eq!(history_string(&[]), "");
    }
}
