use biometrics::{Collector, Counter, Moments};

pub(crate) static SESSION_REQUESTS: Counter = Counter::new("parlor.client.session_requests");
pub(crate) static SESSION_ERRORS: Counter = Counter::new("parlor.client.session_errors");
pub(crate) static CHAT_REQUESTS: Counter = Counter::new("parlor.client.chat_requests");
pub(crate) static CHAT_ERRORS: Counter = Counter::new("parlor.client.chat_errors");
pub(crate) static REQUEST_DURATION: Moments =
    Moments::new("parlor.client.request_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&SESSION_REQUESTS);
    collector.register_counter(&SESSION_ERRORS);
    collector.register_counter(&CHAT_REQUESTS);
    collector.register_counter(&CHAT_ERRORS);
    collector.register_moments(&REQUEST_DURATION);
}
