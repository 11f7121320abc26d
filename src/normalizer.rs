use std::sync::Arc;
use tracing::{debug, info};

use crate::context::RelayContext;
use crate::correlation::{CorrelationFamily, CorrelationStore};
use crate::grammar::{self, Classification, VendorFields};
use crate::inbox::SignalInbox;
use crate::metrics;
use crate::model::{CanonicalOrder, ChannelRole};
use crate::notification::NotificationFormatter;

/// A signal that was stored in the inbox, plus the confirmation to post for it.
#[derive(Debug, Clone)]
pub struct NormalizedSignal {
    pub order: CanonicalOrder,
    pub confirmation: String,
}

/// Classify → canonicalize → correlate → publish → render.
pub struct SignalNormalizer {
    ctx: RelayContext,
    correlations: CorrelationStore,
    inbox: Arc<SignalInbox>,
    formatter: NotificationFormatter,
}

impl SignalNormalizer {
    pub fn new(ctx: RelayContext, inbox: Arc<SignalInbox>) -> Self {
        Self {
            correlations: CorrelationStore::new(ctx.id.clone()),
            ctx,
            inbox,
            formatter: NotificationFormatter::new(),
        }
    }

    pub fn inbox(&self) -> &Arc<SignalInbox> {
        &self.inbox
    }

    /// Run one message from a channel with the given role through the whole pipeline.
    /// Returns `None` when no grammar eligible for the channel matched.
    pub fn ingest(&self, role: ChannelRole, text: &str) -> Option<NormalizedSignal> {
        let (family, fields) = match grammar::classify(role, text) {
            Classification::Matched { family, fields } => (family, fields),
            Classification::NoMatch => {
                debug!(?role, "no grammar matched");
                return None;
            }
        };

        let order = self.canonicalize(fields);
        info!(
            vendor = %family,
            symbol = order.symbol.as_deref().unwrap_or("-"),
            signal_id = order.correlation_id.as_deref().unwrap_or("-"),
            "Signal normalized"
        );
        metrics::inc_signals_normalized(family);

        self.formatter.observe(&order);
        let confirmation = self.formatter.render(&order);
        self.inbox.publish(family, order.clone());

        Some(NormalizedSignal {
            order,
            confirmation,
        })
    }

    /// Map extracted fields onto the canonical order shape, issuing or attaching a
    /// correlation id for two-phase vendors.
    pub fn canonicalize(&self, fields: VendorFields) -> CanonicalOrder {
        let vendor = fields.family();
        let t_signal = self.ctx.time.now_millis();

        match fields {
            VendorFields::PipEntry {
                symbol,
                market,
                side,
            } => CanonicalOrder {
                symbol: Some(symbol),
                side: Some(side),
                market: Some(market),
                entry_prices: Vec::new(),
                stop_loss: None,
                take_profits: Vec::new(),
                vendor,
                correlation_id: CorrelationFamily::of(vendor)
                    .map(|family| self.correlations.record_entry(family)),
                t_signal,
            },
            VendorFields::PipStopTarget {
                stop_loss,
                take_profits,
            } => CanonicalOrder {
                symbol: None,
                side: None,
                market: None,
                entry_prices: Vec::new(),
                stop_loss: Some(stop_loss),
                take_profits,
                vendor,
                correlation_id: CorrelationFamily::of(vendor)
                    .and_then(|family| self.correlations.attach_if_present(family)),
                t_signal,
            },
            VendorFields::PremiumForex {
                symbol,
                side,
                entries,
                stop_loss,
                take_profits,
            } => CanonicalOrder {
                symbol: Some(symbol),
                side: Some(side),
                market: None,
                entry_prices: entries,
                stop_loss: Some(stop_loss),
                take_profits,
                vendor,
                correlation_id: None,
                t_signal,
            },
            VendorFields::EnfoqueCrypto {
                symbol,
                side,
                entry,
                stop_loss,
                take_profits,
            } => CanonicalOrder {
                symbol: Some(symbol),
                side: Some(side),
                market: None,
                entry_prices: vec![entry],
                stop_loss: Some(stop_loss),
                take_profits,
                vendor,
                correlation_id: None,
                t_signal,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Side, VendorFamily};

    fn normalizer() -> SignalNormalizer {
        SignalNormalizer::new(
            RelayContext::new_deterministic(1_700_000_000_000),
            Arc::new(SignalInbox::new()),
        )
    }

    #[test]
    fn stop_target_correlates_to_preceding_entry() {
        let n = normalizer();
        let entry = n.ingest(ChannelRole::Pips, "US100 (NASDAQ) BUY PUSH").unwrap();
        let follow_up = n.ingest(ChannelRole::Pips, "TP1=100.5 TP2=101.2 SL=99.0").unwrap();

        assert!(entry.order.correlation_id.is_some());
        assert_eq!(entry.order.correlation_id, follow_up.order.correlation_id);
        assert_eq!(follow_up.order.symbol, None);
        assert_eq!(follow_up.order.side, None);
    }

    #[test]
    fn newer_entry_supersedes_correlation() {
        let n = normalizer();
        let first = n.ingest(ChannelRole::Pips, "US100 (NASDAQ) BUY PUSH").unwrap();
        let second = n.ingest(ChannelRole::Pips, "XAUUSD (GOLD) SELL PUSH").unwrap();
        let follow_up = n.ingest(ChannelRole::Target, "TP1=2330 SL=2340").unwrap();

        assert_ne!(first.order.correlation_id, second.order.correlation_id);
        assert_eq!(follow_up.order.correlation_id, second.order.correlation_id);
    }

    #[test]
    fn stop_target_without_entry_is_still_accepted() {
        let n = normalizer();
        let follow_up = n.ingest(ChannelRole::Pips, "TP1=100.5 SL=99.0").unwrap();
        assert_eq!(follow_up.order.correlation_id, None);
        assert!(n.inbox().take_latest(VendorFamily::PipStopTarget).is_some());
    }

    #[test]
    fn single_message_vendors_populate_every_field() {
        let n = normalizer();
        let forex = n
            .ingest(ChannelRole::Forex, "GUYS GOLD SELL NOW 3280 SL=3300 TP1=3250")
            .unwrap()
            .order;
        assert_eq!(forex.vendor, VendorFamily::PremiumForex);
        assert_eq!(forex.symbol.as_deref(), Some("XAUUSD"));
        assert_eq!(forex.side, Some(Side::Sell));
        assert_eq!(forex.entry_prices[0].as_str(), "3280");
        assert_eq!(forex.stop_loss.as_ref().unwrap().as_str(), "3300");
        assert_eq!(forex.correlation_id, None);
        assert_eq!(forex.t_signal, 1_700_000_000_000);

        let crypto = n
            .ingest(
                ChannelRole::Crypto,
                "BUY BTCUSD\nEntry price 97100\nSL: 96300\nTP1: 97250\nTP2: 97400",
            )
            .unwrap()
            .order;
        assert_eq!(crypto.vendor, VendorFamily::EnfoqueCrypto);
        assert_eq!(crypto.entry_prices.len(), 1);
        assert_eq!(crypto.take_profits.len(), 2);
        assert_eq!(crypto.correlation_id, None);
    }

    #[test]
    fn ingest_publishes_under_vendor_category() {
        let n = normalizer();
        n.ingest(ChannelRole::Pips, "US100 (NASDAQ) BUY PUSH").unwrap();

        let stored = n.inbox().take_latest(VendorFamily::PipEntry).unwrap();
        assert_eq!(stored.symbol.as_deref(), Some("US100"));
        assert_eq!(stored.market.as_deref(), Some("NASDAQ"));
        assert!(n.inbox().take_latest(VendorFamily::PipEntry).is_none());
    }

    #[test]
    fn unmatched_text_stores_nothing() {
        let n = normalizer();
        assert!(n.ingest(ChannelRole::Target, "hello everyone").is_none());
        assert!(n.ingest(ChannelRole::Forex, "US100 (NASDAQ) BUY PUSH").is_none());
        assert_eq!(n.inbox().pending(), 0);
    }

    #[test]
    fn confirmation_for_follow_up_names_the_entry() {
        let n = normalizer();
        n.ingest(ChannelRole::Pips, "XAUUSD (GOLD) SELL PUSH").unwrap();
        let follow_up = n.ingest(ChannelRole::Pips, "TP1=2330 SL=2340").unwrap();
        assert!(follow_up.confirmation.contains("📈 SELL - `XAUUSD`"));
    }
}
