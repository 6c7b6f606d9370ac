//! Interactive roleplay chat for language practice.
//!
//! This binary lets the learner pick a scenario from the catalog and then
//! practice a conversation with the chat endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Talk to the local development server
//! roleplay-chat
//!
//! # Point at another endpoint
//! ROLEPLAY_CHAT_URL=https://chat.example.com/api/chat roleplay-chat
//! roleplay-chat --endpoint https://chat.example.com/api/chat
//!
//! # Use a custom set of scenarios
//! roleplay-chat --catalog scenarios.yaml
//! ```
//!
//! # Commands
//!
//! - `/back` - Return to the topic list
//! - `/exit` - End the roleplay and go to feedback
//! - `/history` - Show the current screen again
//! - `/stats` - Show session statistics
//! - `/help` - Show available commands
//! - `/quit` - Leave without feedback

use std::sync::Arc;
use std::sync::mpsc as std_mpsc;
use std::thread;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use roleplay_chat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ConversationView, Navigator, PlainTextRenderer,
    RecordingNavigator, Renderer, RoleplaySession, Stage, help_text, parse_command,
};
use roleplay_chat::{ChatBackend, Error};

/// Events delivered from the input thread.
enum Input {
    Line(String),
    Interrupted,
    Eof,
    Failed(String),
}

/// Whether the event loop keeps going after a line.
enum Flow {
    Continue,
    Quit,
}

/// Main entry point for the roleplay-chat application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("roleplay-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    init_logging(config.verbose);

    let catalog = Arc::new(config.load_catalog()?);
    let client = config.build_client()?;
    tracing::debug!(endpoint = %client.endpoint(), "using chat endpoint");

    let mut session = RoleplaySession::new(client, RecordingNavigator::new(), catalog);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut view = ConversationView::new();

    let (input_tx, mut inputs) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = std_mpsc::channel();

    // Ctrl+C outside the line editor ends the session cleanly.
    let interrupt_tx = input_tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(Input::Interrupted);
    })?;

    thread::spawn(move || read_lines(input_tx, ready_rx));

    println!("Roleplay Chat");
    println!("Type /help for commands, /quit to leave\n");
    view.sync(session.state(), &mut renderer);

    loop {
        tokio::select! {
            input = inputs.recv() => {
                match input {
                    Some(Input::Line(line)) => {
                        let flow = handle_line(&mut session, &mut view, &mut renderer, &line);
                        if let Some(route) = session.navigator_mut().take_pending() {
                            renderer.print_info(&format!("피드백 화면으로 이동합니다 ({route})"));
                            break;
                        }
                        if let Flow::Quit = flow {
                            println!("Goodbye!");
                            break;
                        }
                        view.sync(session.state(), &mut renderer);
                        if ready_tx.send(()).is_err() {
                            break;
                        }
                    }
                    Some(Input::Interrupted) | Some(Input::Eof) | None => {
                        println!("\nGoodbye!");
                        break;
                    }
                    Some(Input::Failed(message)) => {
                        renderer.print_error(&format!("Input error: {}", message));
                        break;
                    }
                }
            }
            Some(_) = session.next_completion(), if session.in_flight() > 0 => {
                view.sync(session.state(), &mut renderer);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

/// Reads lines on a dedicated thread, waiting for the event loop to finish
/// with each line before prompting again.
fn read_lines(tx: mpsc::UnboundedSender<Input>, ready: std_mpsc::Receiver<()>) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            let _ = tx.send(Input::Failed(err.to_string()));
            return;
        }
    };

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                if tx.send(Input::Line(line)).is_err() || ready.recv().is_err() {
                    return;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
            }
            Err(ReadlineError::Eof) => {
                let _ = tx.send(Input::Eof);
                return;
            }
            Err(err) => {
                let _ = tx.send(Input::Failed(err.to_string()));
                return;
            }
        }
    }
}

fn handle_line<B: ChatBackend + 'static, N: Navigator>(
    session: &mut RoleplaySession<B, N>,
    view: &mut ConversationView,
    renderer: &mut dyn Renderer,
    line: &str,
) -> Flow {
    if let Some(cmd) = parse_command(line) {
        match cmd {
            ChatCommand::Quit => return Flow::Quit,
            ChatCommand::Exit => session.exit(),
            ChatCommand::Back => match session.state().stage() {
                Stage::ChoosingSubtopic { .. } => session.back_to_topics(),
                Stage::ChoosingTopic => renderer.print_info("이미 주제 목록입니다."),
                Stage::Conversing { .. } => {
                    renderer.print_error("Use /exit to end the roleplay first.")
                }
            },
            ChatCommand::History => view.render_all(session.state(), renderer),
            ChatCommand::Stats => print_stats(session),
            ChatCommand::Help => {
                for line in help_text().lines() {
                    println!("    {}", line);
                }
            }
            ChatCommand::Invalid(message) => renderer.print_error(&message),
        }
        return Flow::Continue;
    }

    if let Err(err) = handle_input(session, line) {
        renderer.print_error(&err.to_string());
    }
    Flow::Continue
}

fn handle_input<B: ChatBackend + 'static, N: Navigator>(
    session: &mut RoleplaySession<B, N>,
    line: &str,
) -> Result<(), Error> {
    let topic = session.state().topic().map(str::to_string);
    match (topic, session.state().subtopic().is_some()) {
        (None, _) => {
            let Some(name) = session.catalog().resolve_topic(line).map(|t| t.name.clone()) else {
                return Err(Error::invalid_selection(
                    "pick a topic by number or name",
                    Some(line.trim().to_string()),
                ));
            };
            session.select_topic(&name)
        }
        (Some(topic), false) => {
            let Some(name) = session
                .catalog()
                .resolve_subtopic(&topic, line)
                .map(str::to_string)
            else {
                return Err(Error::invalid_selection(
                    "pick a situation by number or name",
                    Some(line.trim().to_string()),
                ));
            };
            session.select_subtopic(&name)
        }
        (Some(_), true) => session.submit(line).map(|_| ()),
    }
}

fn print_stats<B: ChatBackend + 'static, N: Navigator>(session: &RoleplaySession<B, N>) {
    let stats = session.stats();
    let state = session.state();
    println!("    Session Statistics:");
    println!("      Stage: {}", state.stage().header());
    println!("      Messages: {}", stats.history_len);
    println!(
        "      Requests: {} ({} replies, {} failed, {} in flight)",
        stats.requests, stats.replies, stats.failures, stats.in_flight
    );
    println!("      Stale replies discarded: {}", stats.stale_replies);
}
