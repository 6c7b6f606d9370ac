//! Core roleplay session management.
//!
//! `RoleplaySession` owns the view state, carries out the effects its
//! transitions request, and folds request outcomes back into the state in the
//! order they complete.

use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::catalog::Catalog;
use crate::chat::navigation::Navigator;
use crate::chat::state::{Action, Effect, RequestKind, RoleplayState, Ticket};
use crate::client::ChatBackend;
use crate::error::Result;
use crate::observability::{
    SESSION_EXITS, SESSION_INIT_CALLS, SESSION_SENDS, SESSION_STALE_REPLIES,
};
use crate::types::{ChatReply, ChatRequest};

/// The outcome of one request, tagged with the selection it was issued under.
struct Completion {
    ticket: Ticket,
    kind: RequestKind,
    outcome: Result<ChatReply>,
}

/// What happened when a request completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// The assistant's reply was appended.
    Replied,
    /// The request failed and an error entry was appended.
    Failed,
    /// The selection changed while the request was in flight; nothing was appended.
    Stale,
}

/// Aggregated counters for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Requests issued, both init calls and messages.
    pub requests: u64,
    /// Requests that completed with a reply that was applied.
    pub replies: u64,
    /// Requests that failed and were shown as an error entry.
    pub failures: u64,
    /// Completions dropped because the selection had changed.
    pub stale_replies: u64,
    /// Requests still waiting for a response.
    pub in_flight: usize,
    /// Entries in the current conversation.
    pub history_len: usize,
}

/// A roleplay session bound to a chat backend and a navigator.
pub struct RoleplaySession<B: ChatBackend + 'static, N: Navigator> {
    backend: Arc<B>,
    navigator: N,
    state: RoleplayState,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    requests: u64,
    replies: u64,
    failures: u64,
    stale_replies: u64,
}

impl<B: ChatBackend + 'static, N: Navigator> RoleplaySession<B, N> {
    /// Creates a new session with an empty selection.
    pub fn new(backend: B, navigator: N, catalog: Arc<Catalog>) -> Self {
        Self::with_shared_backend(Arc::new(backend), navigator, catalog)
    }

    /// Creates a new session over a backend shared with the caller.
    pub fn with_shared_backend(backend: Arc<B>, navigator: N, catalog: Arc<Catalog>) -> Self {
        Self {
            backend,
            navigator,
            state: RoleplayState::new(catalog),
            in_flight: FuturesUnordered::new(),
            requests: 0,
            replies: 0,
            failures: 0,
            stale_replies: 0,
        }
    }

    /// The current view state.
    pub fn state(&self) -> &RoleplayState {
        &self.state
    }

    /// The catalog offered to the learner.
    pub fn catalog(&self) -> &Catalog {
        self.state.catalog()
    }

    /// The navigator exit hands off to.
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// The navigator, for mutation.
    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    /// Chooses a topic.
    pub fn select_topic(&mut self, topic: &str) -> Result<()> {
        self.dispatch(Action::SelectTopic(topic.to_string()))
    }

    /// Chooses a subtopic and issues the init call.
    pub fn select_subtopic(&mut self, subtopic: &str) -> Result<()> {
        self.dispatch(Action::SelectSubtopic(subtopic.to_string()))
    }

    /// Returns to the topic list.
    pub fn back_to_topics(&mut self) {
        // Clearing a selection cannot fail.
        let _ = self.dispatch(Action::BackToTopics);
    }

    /// Replaces the draft.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        let _ = self.dispatch(Action::EditDraft(text.into()));
    }

    /// Sends the draft.
    ///
    /// Returns `Ok(false)` without touching anything when the draft is blank.
    /// The user's line is in the history and the draft is empty by the time
    /// this returns; the reply arrives through [`Self::next_completion`].
    pub fn send_message(&mut self) -> Result<bool> {
        let before = self.requests;
        self.dispatch(Action::Send)?;
        Ok(self.requests > before)
    }

    /// Replaces the draft with `text` and sends it.
    pub fn submit(&mut self, text: impl Into<String>) -> Result<bool> {
        self.set_draft(text);
        self.send_message()
    }

    /// Resets the session and requests navigation to feedback.
    ///
    /// Requests still in flight are left to complete; their replies are
    /// discarded as stale.
    pub fn exit(&mut self) {
        SESSION_EXITS.click();
        let _ = self.dispatch(Action::Exit);
    }

    /// Number of requests awaiting a response.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Waits for the next request to complete and applies its outcome.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Update> {
        let Completion {
            ticket,
            kind,
            outcome,
        } = self.in_flight.next().await?;

        if !self.state.is_current(ticket) {
            SESSION_STALE_REPLIES.click();
            self.stale_replies += 1;
            tracing::debug!(
                generation = ticket.generation(),
                current = self.state.generation(),
                "discarding reply for an earlier selection"
            );
            return Some(Update::Stale);
        }

        let (action, update) = match outcome {
            Ok(reply) => {
                self.replies += 1;
                (
                    Action::ReplyReceived {
                        ticket,
                        reply: reply.reply,
                    },
                    Update::Replied,
                )
            }
            Err(err) => {
                self.failures += 1;
                match kind {
                    RequestKind::Message => {
                        tracing::warn!(error = %err, "error communicating with the chat endpoint")
                    }
                    RequestKind::Initialize => {
                        tracing::debug!(error = %err, "conversation initialization failed")
                    }
                }
                (Action::ReplyFailed { ticket }, Update::Failed)
            }
        };
        let _ = self.dispatch(action);
        Some(update)
    }

    /// Waits until every in-flight request has completed.
    pub async fn settle(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        while let Some(update) = self.next_completion().await {
            updates.push(update);
        }
        updates
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            requests: self.requests,
            replies: self.replies,
            failures: self.failures,
            stale_replies: self.stale_replies,
            in_flight: self.in_flight.len(),
            history_len: self.state.history().len(),
        }
    }

    fn dispatch(&mut self, action: Action) -> Result<()> {
        for effect in self.state.apply(action)? {
            match effect {
                Effect::Request {
                    ticket,
                    kind,
                    request,
                } => self.issue(ticket, kind, request),
                Effect::Navigate(route) => {
                    tracing::debug!(%route, "navigating");
                    self.navigator.navigate(route);
                }
            }
        }
        Ok(())
    }

    fn issue(&mut self, ticket: Ticket, kind: RequestKind, request: ChatRequest) {
        match kind {
            RequestKind::Initialize => SESSION_INIT_CALLS.click(),
            RequestKind::Message => SESSION_SENDS.click(),
        }
        self.requests += 1;
        tracing::debug!(topic = %request.topic, ?kind, "issuing chat request");
        let backend = Arc::clone(&self.backend);
        self.in_flight.push(Box::pin(async move {
            let started = Instant::now();
            let outcome = backend.chat(&request).await;
            tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                ok = outcome.is_ok(),
                "chat request completed"
            );
            Completion {
                ticket,
                kind,
                outcome,
            }
        }));
    }
}
