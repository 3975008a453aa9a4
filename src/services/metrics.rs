use lazy_static::lazy_static;
use prometheus::{register_counter, register_counter_vec, Counter, CounterVec};

lazy_static! {
    pub static ref SETTINGS_UPDATES_COUNTER: Counter = register_counter!(
        "api_banner_settings_updates_total",
        "Banner settings saved through the admin API"
    ).unwrap();

    pub static ref CONTENT_SEARCHES_COUNTER: CounterVec = register_counter_vec!(
        "api_content_searches_total",
        "Typeahead searches by content kind",
        &["kind"]
    ).unwrap();

    pub static ref REJECTED_NONCES_COUNTER: Counter = register_counter!(
        "api_rejected_nonces_total",
        "Search requests refused for a missing or invalid nonce"
    ).unwrap();

    pub static ref STORE_FAILURES_COUNTER: CounterVec = register_counter_vec!(
        "api_store_failures_total",
        "Settings or content store errors by operation",
        &["operation"]
    ).unwrap();
}
