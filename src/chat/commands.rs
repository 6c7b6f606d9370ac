//! Slash command parsing for the roleplay chat.
//!
//! Input that starts with `/` controls the session and is never sent to the
//! chat endpoint. Anything else is a choice or a message, depending on the
//! stage.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Return to the topic list.
    Back,

    /// End the roleplay and move on to feedback.
    Exit,

    /// Re-render the current screen.
    History,

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Leave the application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be treated as a choice or a message.
///
/// # Examples
///
/// ```
/// # use roleplay_chat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/exit"), Some(ChatCommand::Exit));
/// assert!(parse_command("I have a cough.").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "back" | "topics" => no_argument(argument, ChatCommand::Back, "/back"),
        "exit" | "end" => no_argument(argument, ChatCommand::Exit, "/exit"),
        "history" => no_argument(argument, ChatCommand::History, "/history"),
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn no_argument(argument: Option<&str>, command: ChatCommand, name: &str) -> ChatCommand {
    match argument {
        Some(_) => ChatCommand::Invalid(format!("{} takes no arguments", name)),
        None => command,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Choose a topic and a situation by number or by name, then type to chat.
Available commands:
  /back                  Return to the topic list (before a situation is chosen)
  /exit                  End the roleplay and go to feedback
  /history               Show the current screen again
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Leave without feedback"#
}
