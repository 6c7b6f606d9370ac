//! View state for the roleplay chat and its transitions.
//!
//! `RoleplayState` holds the selection, the conversation and the draft.
//! Every change goes through [`RoleplayState::apply`], which mutates the state
//! and returns the side effects (requests to issue, navigation) for the caller
//! to carry out. Nothing here performs I/O.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::chat::navigation::Route;
use crate::error::{Error, Result};
use crate::types::{ChatRequest, HistoryEntry, history_string, topic_label};

/// Text of the entry appended when the assistant's response is unavailable.
pub const RESPONSE_UNAVAILABLE: &str = "응답 오류가 발생했습니다.";

/// Identifies the selection a request was issued under.
///
/// Replies carrying a ticket from an earlier generation are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    /// The generation this ticket belongs to.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Which of the two chat calls a request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Seeds the assistant's opening line after a subtopic is chosen.
    Initialize,
    /// Carries a message typed by the learner.
    Message,
}

/// An input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Choose a topic; clears any subtopic.
    SelectTopic(String),
    /// Choose a subtopic of the selected topic and start the conversation.
    SelectSubtopic(String),
    /// Return to the topic list.
    BackToTopics,
    /// Replace the draft text.
    EditDraft(String),
    /// Send the draft.
    Send,
    /// A request completed with a reply.
    ReplyReceived {
        /// The ticket of the completed request.
        ticket: Ticket,
        /// The assistant's text.
        reply: String,
    },
    /// A request failed.
    ReplyFailed {
        /// The ticket of the failed request.
        ticket: Ticket,
    },
    /// End the session and move on to feedback.
    Exit,
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST `request` to the chat endpoint.
    Request {
        /// Tag to hand back with the outcome.
        ticket: Ticket,
        /// Whether this is the init call or a message.
        kind: RequestKind,
        /// The body to send.
        request: ChatRequest,
    },
    /// Hand control to another screen.
    Navigate(Route),
}

/// Where the learner is in the flow, derived from the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage<'a> {
    /// No topic chosen.
    ChoosingTopic,
    /// Topic chosen, subtopic not yet.
    ChoosingSubtopic {
        /// The chosen topic.
        topic: &'a str,
    },
    /// Both chosen; messages can be exchanged.
    Conversing {
        /// The chosen topic.
        topic: &'a str,
        /// The chosen subtopic.
        subtopic: &'a str,
    },
}

impl Stage<'_> {
    /// The header shown above the current screen.
    pub fn header(&self) -> String {
        match self {
            Stage::ChoosingTopic => "💬 롤플레이 주제 선택".to_string(),
            Stage::ChoosingSubtopic { topic } => format!("💬 세부 상황 선택: {topic}"),
            Stage::Conversing { topic, subtopic } => {
                format!("💬 롤플레이: {}", topic_label(topic, subtopic))
            }
        }
    }
}

/// Selection, conversation and draft for one roleplay view.
#[derive(Debug, Clone)]
pub struct RoleplayState {
    catalog: Arc<Catalog>,
    topic: Option<String>,
    subtopic: Option<String>,
    history: Vec<HistoryEntry>,
    draft: String,
    generation: u64,
}

impl RoleplayState {
    /// Creates an empty state over `catalog`.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            topic: None,
            subtopic: None,
            history: Vec::new(),
            draft: String::new(),
            generation: 0,
        }
    }

    /// The catalog selections are validated against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The selected topic, if any.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// The selected subtopic, if any.
    pub fn subtopic(&self) -> Option<&str> {
        self.subtopic.as_deref()
    }

    /// The conversation, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The unsent message.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Counter bumped on every selection change and on exit.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The ticket a request issued now would carry.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.generation,
        }
    }

    /// Returns true if a reply for `ticket` still belongs to this selection.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Where the learner is in the flow.
    pub fn stage(&self) -> Stage<'_> {
        match (self.topic.as_deref(), self.subtopic.as_deref()) {
            (Some(topic), Some(subtopic)) => Stage::Conversing { topic, subtopic },
            (Some(topic), None) => Stage::ChoosingSubtopic { topic },
            _ => Stage::ChoosingTopic,
        }
    }

    /// Applies `action` and returns the effects the caller must carry out.
    ///
    /// Invalid selections and sends outside a conversation are rejected with
    /// `Error::InvalidSelection` and leave the state untouched.
    pub fn apply(&mut self, action: Action) -> Result<Vec<Effect>> {
        match action {
            Action::SelectTopic(topic) => {
                self.select_topic(topic)?;
                Ok(Vec::new())
            }
            Action::SelectSubtopic(subtopic) => self.select_subtopic(subtopic).map(|e| vec![e]),
            Action::BackToTopics => {
                self.topic = None;
                self.subtopic = None;
                self.generation += 1;
                Ok(Vec::new())
            }
            Action::EditDraft(text) => {
                self.draft = text;
                Ok(Vec::new())
            }
            Action::Send => Ok(self.send()?.into_iter().collect()),
            Action::ReplyReceived { ticket, reply } => {
                self.receive(ticket, HistoryEntry::assistant(reply));
                Ok(Vec::new())
            }
            Action::ReplyFailed { ticket } => {
                self.receive(ticket, HistoryEntry::error(RESPONSE_UNAVAILABLE));
                Ok(Vec::new())
            }
            Action::Exit => {
                self.topic = None;
                self.subtopic = None;
                self.history.clear();
                self.draft.clear();
                self.generation += 1;
                Ok(vec![Effect::Navigate(Route::Feedback)])
            }
        }
    }

    fn select_topic(&mut self, topic: String) -> Result<()> {
        if !self.catalog.contains_topic(&topic) {
            return Err(Error::invalid_selection(
                "topic is not in the catalog",
                Some(topic),
            ));
        }
        self.topic = Some(topic);
        self.subtopic = None;
        self.generation += 1;
        Ok(())
    }

    fn select_subtopic(&mut self, subtopic: String) -> Result<Effect> {
        let Some(topic) = self.topic.as_deref() else {
            return Err(Error::invalid_selection(
                "choose a topic before a subtopic",
                Some(subtopic),
            ));
        };
        if !self.catalog.contains_subtopic(topic, &subtopic) {
            return Err(Error::invalid_selection(
                format!("subtopic is not offered under {topic}"),
                Some(subtopic),
            ));
        }
        let label = topic_label(topic, &subtopic);
        self.history = vec![HistoryEntry::notice(format!("You selected: {label}"))];
        self.subtopic = Some(subtopic);
        self.generation += 1;
        Ok(Effect::Request {
            ticket: self.ticket(),
            kind: RequestKind::Initialize,
            request: ChatRequest::initialize(label),
        })
    }

    fn send(&mut self) -> Result<Option<Effect>> {
        let text = self.draft.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let Stage::Conversing { topic, subtopic } = self.stage() else {
            return Err(Error::invalid_selection(
                "choose a topic and subtopic before sending",
                None,
            ));
        };
        let label = topic_label(topic, subtopic);
        let text = text.to_string();
        self.history.push(HistoryEntry::user(text.clone()));
        self.draft.clear();
        let messages = history_string(&self.history);
        Ok(Some(Effect::Request {
            ticket: self.ticket(),
            kind: RequestKind::Message,
            request: ChatRequest::new(label, text, messages),
        }))
    }

    fn receive(&mut self, ticket: Ticket, entry: HistoryEntry) {
        if self.is_current(ticket) {
            self.history.push(entry);
        }
    }
}
