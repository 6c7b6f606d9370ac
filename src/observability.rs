use biometrics::{Collector, Counter, Moments};

pub(crate) static CHAT_REQUESTS: Counter = Counter::new("roleplay_chat.client.requests");
pub(crate) static CHAT_REQUEST_ERRORS: Counter =
    Counter::new("roleplay_chat.client.request_errors");
pub(crate) static CHAT_REQUEST_DURATION: Moments =
    Moments::new("roleplay_chat.client.request_duration_seconds");

pub(crate) static SESSION_INIT_CALLS: Counter = Counter::new("roleplay_chat.session.init_calls");
pub(crate) static SESSION_SENDS: Counter = Counter::new("roleplay_chat.session.sends");
pub(crate) static SESSION_STALE_REPLIES: Counter =
    Counter::new("roleplay_chat.session.stale_replies");
pub(crate) static SESSION_EXITS: Counter = Counter::new("roleplay_chat.session.exits");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: &Collector) {
    collector.register_counter(&CHAT_REQUESTS);
    collector.register_counter(&CHAT_REQUEST_ERRORS);
    collector.register_moments(&CHAT_REQUEST_DURATION);

    collector.register_counter(&SESSION_INIT_CALLS);
    collector.register_counter(&SESSION_SENDS);
    collector.register_counter(&SESSION_STALE_REPLIES);
    collector.register_counter(&SESSION_EXITS);
}
