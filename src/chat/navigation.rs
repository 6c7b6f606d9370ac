//! Hand-off to whatever comes after a roleplay session.

use std::fmt;

/// A destination outside the roleplay view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The post-session feedback screen.
    Feedback,
}

impl Route {
    /// The route path.
    pub fn path(self) -> &'static str {
        match self {
            Route::Feedback => "/feedback",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Receives navigation requests from the session.
pub trait Navigator: Send {
    /// Requests a transition to `route`.
    fn navigate(&mut self, route: Route);
}

/// Navigator that remembers every requested route.
///
/// The terminal front end polls it after each action; tests inspect it.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Vec<Route>,
    pending: Option<Route>,
}

impl RecordingNavigator {
    /// Creates an empty navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every route requested so far, oldest first.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Takes the most recent request that has not been taken yet.
    pub fn take_pending(&mut self) -> Option<Route> {
        self.pending.take()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, route: Route) {
        self.routes.push(route);
        self.pending = Some(route);
    }
}
