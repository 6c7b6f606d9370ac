// Public modules
pub mod catalog;
pub mod chat;
pub mod client;
pub mod error;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use catalog::{Catalog, Topic};
pub use client::{ChatBackend, HttpChatClient};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
