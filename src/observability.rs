use biometrics::{Collector, Counter, Moments};

pub(crate) static COMMANDS_DISPATCHED: Counter = Counter::new("ntc.commands.dispatched");
pub(crate) static COMMANDS_UNKNOWN: Counter = Counter::new("ntc.commands.unknown");
pub(crate) static COMMAND_DURATION: Moments = Moments::new("ntc.commands.duration_seconds");

pub(crate) static CLIENT_ERRORS: Counter = Counter::new("ntc.client.errors");
pub(crate) static CLIENT_WRITE_FORBIDDEN: Counter = Counter::new("ntc.client.write_forbidden");

pub(crate) static MESSAGES_RENDERED: Counter = Counter::new("ntc.render.messages");
pub(crate) static LIVE_MESSAGES: Counter = Counter::new("ntc.render.live_messages");

pub(crate) static DRAFTS_SAVED: Counter = Counter::new("ntc.store.drafts_saved");
pub(crate) static STORE_LOAD_FALLBACKS: Counter = Counter::new("ntc.store.load_fallbacks");
pub(crate) static STORE_SAVE_FAILURES: Counter = Counter::new("ntc.store.save_failures");

pub(crate) static RECEIPT_POLLS: Counter = Counter::new("ntc.receipts.polls");
pub(crate) static RECEIPT_POLL_ERRORS: Counter = Counter::new("ntc.receipts.poll_errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&COMMANDS_DISPATCHED);
    collector.register_counter(&COMMANDS_UNKNOWN);
    collector.register_moments(&COMMAND_DURATION);

    collector.register_counter(&CLIENT_ERRORS);
    collector.register_counter(&CLIENT_WRITE_FORBIDDEN);

    collector.register_counter(&MESSAGES_RENDERED);
    collector.register_counter(&LIVE_MESSAGES);

    collector.register_counter(&DRAFTS_SAVED);
    collector.register_counter(&STORE_LOAD_FALLBACKS);
    collector.register_counter(&STORE_SAVE_FAILURES);

    collector.register_counter(&RECEIPT_POLLS);
    collector.register_counter(&RECEIPT_POLL_ERRORS);
}
