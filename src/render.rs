//! Output rendering for the roleplay chat.
//!
//! This module provides a trait-based rendering abstraction so the terminal
//! front end and tests can share the same view logic. The default
//! implementation writes to stdout with optional ANSI styling per sender.

use std::io::{self, Stdout, Write};

use crate::types::{HistoryEntry, Sender};

/// ANSI escape code for bold text (used for headers).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for local notices).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for assistant replies).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the learner's lines).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering the roleplay screens.
pub trait Renderer: Send {
    /// Print the header line for the current stage.
    fn print_header(&mut self, header: &str);

    /// Print a prompt followed by a numbered list of choices.
    fn print_choices(&mut self, prompt: &str, choices: &[String]);

    /// Print one conversation row.
    fn print_entry(&mut self, entry: &HistoryEntry);

    /// Print an error message that is not part of the conversation.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// One display row per history entry, in order.
pub fn conversation_rows(history: &[HistoryEntry]) -> Vec<String> {
    history.iter().map(HistoryEntry::display_line).collect()
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn color_for(sender: Sender) -> &'static str {
        match sender {
            Sender::User => ANSI_GREEN,
            Sender::Assistant => ANSI_CYAN,
            Sender::SystemNotice => ANSI_DIM,
            Sender::Error => ANSI_RED,
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_header(&mut self, header: &str) {
        if self.use_color {
            println!("\n{ANSI_BOLD}{header}{ANSI_RESET}");
        } else {
            println!("\n{header}");
        }
        self.flush();
    }

    fn print_choices(&mut self, prompt: &str, choices: &[String]) {
        println!("{prompt}");
        for (index, choice) in choices.iter().enumerate() {
            println!("  {}. {choice}", index + 1);
        }
        self.flush();
    }

    fn print_entry(&mut self, entry: &HistoryEntry) {
        if self.use_color {
            let color = Self::color_for(entry.sender);
            println!("{color}{entry}{ANSI_RESET}");
        } else {
            println!("{entry}");
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn one_row_per_entry_in_order() {
        let history = vec![
            HistoryEntry::notice("You selected: A - a"),
            HistoryEntry::assistant("Welcome"),
            HistoryEntry::user("hi"),
            HistoryEntry::user("hi"),
            HistoryEntry::error("unavailable"),
        ];
        assert_eq!(
            conversation_rows(&history),
            vec![
                "You selected: A - a",
                "🤖: Welcome",
                "🧑: hi",
                "🧑: hi",
                "❌ unavailable",
            ]
        );
    }
}
