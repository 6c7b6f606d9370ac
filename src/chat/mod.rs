//! Roleplay chat application module.
//!
//! This module provides the terminal roleplay flow built on top of the chat
//! client. It supports:
//!
//! - Choosing a topic and a situation from the catalog
//! - Exchanging messages with replies applied in completion order
//! - Dropping replies that arrive after the selection changed
//! - Slash commands for session control
//!
//! # Architecture
//!
//! - [`state`]: the view state and its pure transitions
//! - [`session`]: runs transitions against a chat backend and a navigator
//! - [`view`]: incremental screen rendering
//! - [`commands`]: slash command parsing
//! - [`config`]: CLI argument parsing and configuration
//! - [`navigation`]: the hand-off after a session ends

pub mod commands;
pub mod config;
pub mod navigation;
pub mod session;
pub mod state;
pub mod view;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use navigation::{Navigator, RecordingNavigator, Route};
pub use session::{RoleplaySession, SessionStats, Update};
pub use state::{Action, Effect, RESPONSE_UNAVAILABLE, RequestKind, RoleplayState, Stage, Ticket};
pub use view::ConversationView;
