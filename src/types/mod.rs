// Public modules
pub mod chat_reply;
pub mod chat_request;
pub mod history_entry;

// Re-exports
pub use chat_reply::ChatReply;
pub use chat_request::{ChatRequest, topic_label};
pub use history_entry::{HistoryEntry, Sender, history_string};
