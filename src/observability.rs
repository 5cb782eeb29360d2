use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("agno_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("agno_chat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("agno_chat.client.request_duration_seconds");

pub(crate) static HEALTH_CHECKS: Counter = Counter::new("agno_chat.health.checks");
pub(crate) static HEALTH_CHECK_FAILURES: Counter = Counter::new("agno_chat.health.failures");

pub(crate) static STREAM_CHUNKS: Counter = Counter::new("agno_chat.stream.chunks");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("agno_chat.stream.errors");
pub(crate) static STREAM_BYTES: Counter = Counter::new("agno_chat.stream.bytes");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&HEALTH_CHECKS);
    collector.register_counter(&HEALTH_CHECK_FAILURES);

    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_BYTES);
}
