use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

use crate::model::VendorFamily;

pub static MESSAGES_RECEIVED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "signal_relay_messages_received_total",
        "Chat messages received from watched channels"
    )
    .expect("messages_received counter")
});

pub static SIGNALS_NORMALIZED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "signal_relay_signals_normalized_total",
        "Messages recognized and normalized into an order",
        &["vendor"]
    )
    .expect("signals_normalized counter")
});

pub static MESSAGES_IGNORED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "signal_relay_messages_ignored_total",
        "Messages from watched channels that matched no grammar"
    )
    .expect("messages_ignored counter")
});

pub static UNKNOWN_CHANNEL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "signal_relay_unknown_channel_total",
        "Messages from channels outside the watched set"
    )
    .expect("unknown_channel counter")
});

pub static DELIVERY_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "signal_relay_delivery_failures_total",
        "Confirmation posts that failed"
    )
    .expect("delivery_failures counter")
});

pub static SIGNALS_COALESCED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "signal_relay_signals_coalesced_total",
        "Unconsumed signals overwritten by a newer one",
        &["vendor"]
    )
    .expect("signals_coalesced counter")
});

pub static SIGNALS_SERVED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "signal_relay_signals_served_total",
        "Signals handed to the execution client",
        &["vendor"]
    )
    .expect("signals_served counter")
});

pub fn inc_messages_received() {
    MESSAGES_RECEIVED.inc();
}

pub fn inc_signals_normalized(vendor: VendorFamily) {
    SIGNALS_NORMALIZED.with_label_values(&[vendor.tag()]).inc();
}

pub fn inc_messages_ignored() {
    MESSAGES_IGNORED.inc();
}

pub fn inc_unknown_channel() {
    UNKNOWN_CHANNEL.inc();
}

pub fn inc_delivery_failures() {
    DELIVERY_FAILURES.inc();
}

pub fn inc_signals_coalesced(vendor: VendorFamily) {
    SIGNALS_COALESCED.with_label_values(&[vendor.tag()]).inc();
}

pub fn inc_signals_served(vendor: VendorFamily) {
    SIGNALS_SERVED.with_label_values(&[vendor.tag()]).inc();
}

/// Prometheus text exposition of the default registry.
pub fn render() -> String {
    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&prometheus::gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        inc_signals_served(VendorFamily::EnfoqueCrypto);
        let text = render();
        assert!(text.contains("signal_relay_signals_served_total"));
        assert!(text.contains("vendor=\"enfoque_btc\""));
    }
}
