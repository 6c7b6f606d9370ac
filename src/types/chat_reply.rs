use serde::{Deserialize, Serialize};

/// The body returned by the chat endpoint.
///
/// Only `reply` is read; any other fields are ignored. A body without a
/// string `reply` fails to deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// The assistant's reply text.
    pub reply: String,
}

impl ChatReply {
    /// Create a new `ChatReply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_extra_fields() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"reply": "Welcome", "model": "whatever"}"#).unwrap();
        assert_eq!(reply, ChatReply::new("Welcome"));
    }

    #[test]
    fn missing_reply_is_an_error() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"error": "quota"}"#).is_err());
        assert!(serde_json::from_str::<ChatReply>(r#"{"reply": null}"#).is_err());
    }
}
