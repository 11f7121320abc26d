use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::channels::ChannelDirectory;
use crate::metrics;
use crate::model::{ChannelRole, VendorFamily};
use crate::normalizer::SignalNormalizer;
use crate::notification::ignored_notice;
use crate::transport::{ChatTransport, RawMessage};

const POLL_BACKOFF: Duration = Duration::from_secs(5);
const HEARTBEAT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Normalized(VendorFamily),
    Ignored(ChannelRole),
    UnknownChannel,
}

/// Handles chat events one at a time: resolve channel, normalize, post confirmation.
pub struct Relay {
    transport: Arc<dyn ChatTransport>,
    normalizer: Arc<SignalNormalizer>,
    channels: ChannelDirectory,
    notify_ignored: bool,
}

impl Relay {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        normalizer: Arc<SignalNormalizer>,
        channels: ChannelDirectory,
        notify_ignored: bool,
    ) -> Self {
        Self {
            transport,
            normalizer,
            channels,
            notify_ignored,
        }
    }

    pub async fn handle_event(&self, message: RawMessage) -> EventOutcome {
        metrics::inc_messages_received();
        let channel_id = message.source_channel_id;

        let Some(role) = self.channels.resolve(channel_id) else {
            warn!(channel_id, "Message from unwatched channel ignored");
            metrics::inc_unknown_channel();
            return EventOutcome::UnknownChannel;
        };
        info!(channel_id, ?role, "Message received");

        match self.normalizer.ingest(role, &message.text) {
            Some(signal) => {
                self.deliver(&signal.confirmation).await;
                EventOutcome::Normalized(signal.order.vendor)
            }
            None => {
                info!(channel_id, ?role, "📭 Not a signal");
                metrics::inc_messages_ignored();
                if self.notify_ignored {
                    self.deliver(ignored_notice(role)).await;
                }
                EventOutcome::Ignored(role)
            }
        }
    }

    /// Post to the target channel. Failures are logged and counted, never retried.
    async fn deliver(&self, text: &str) {
        let target = self.channels.target();
        match self.transport.post(target, text).await {
            Ok(()) => info!(channel_id = target, "✅ Confirmation posted"),
            Err(e) => {
                error!(
                    channel_id = target,
                    transport = self.transport.name(),
                    "❌ Failed to post confirmation: {}",
                    e
                );
                metrics::inc_delivery_failures();
            }
        }
    }
}

/// Spawn the relay loop. Events from a batch are handled strictly in order.
pub fn start_relay(relay: Arc<Relay>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(transport = relay.transport.name(), "🚀 Relay listening for signals");
        let mut heartbeat = tokio::time::interval(HEARTBEAT);
        heartbeat.tick().await;

        loop {
            tokio::select! {
                batch = relay.transport.poll() => match batch {
                    Ok(messages) => {
                        for message in messages {
                            relay.handle_event(message).await;
                        }
                    }
                    Err(e) => {
                        error!("Transport poll failed: {}", e);
                        tokio::time::sleep(POLL_BACKOFF).await;
                    }
                },
                _ = heartbeat.tick() => {
                    let pending = relay.normalizer.inbox().pending();
                    info!(pending, "Heartbeat... signals awaiting pickup");
                }
            }
        }
    })
}
