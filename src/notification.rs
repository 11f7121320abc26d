use parking_lot::RwLock;

use crate::model::{CanonicalOrder, ChannelRole, Side, VendorFamily};

fn header(vendor: VendorFamily) -> &'static str {
    match vendor {
        VendorFamily::PipEntry => "📢 New Mr Pips signal",
        VendorFamily::PipStopTarget => "📢 Mr Pips TP and SL",
        VendorFamily::PremiumForex => "📢 New Premium Forex signal",
        VendorFamily::EnfoqueCrypto => "📢 New Enfoque BTC signal",
    }
}

/// Notice posted when a watched channel sends something that is not a signal.
pub fn ignored_notice(role: ChannelRole) -> &'static str {
    match role {
        ChannelRole::Pips => "⚠️ Received a message from Mr Pips, but it is not a signal",
        ChannelRole::Forex => "⚠️ Received a message from VIP Premium Forex, but it is not a signal",
        ChannelRole::Crypto => "⚠️ Received a message from El Enfoque, but it is not a signal",
        ChannelRole::Target => "⚠️ Received a message on the target group, but it is not a signal",
    }
}

/// Renders confirmations posted back to chat.
///
/// Stop/target messages carry no symbol, so their confirmation borrows symbol and side
/// from the last Pip entry seen. This is display only and independent of correlation ids.
#[derive(Default)]
pub struct NotificationFormatter {
    last_pip_entry: RwLock<Option<(String, Side)>>,
}

impl NotificationFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `order` as the backfill source if it is a Pip entry.
    pub fn observe(&self, order: &CanonicalOrder) {
        if order.vendor != VendorFamily::PipEntry {
            return;
        }
        if let Some((symbol, side)) = order.direction() {
            *self.last_pip_entry.write() = Some((symbol.to_string(), side));
        }
    }

    pub fn render(&self, order: &CanonicalOrder) -> String {
        let mut lines = vec![format!("{}\n", header(order.vendor))];

        let direction = match order.vendor {
            VendorFamily::PipStopTarget => self.last_pip_entry.read().clone(),
            _ => order
                .direction()
                .map(|(symbol, side)| (symbol.to_string(), side)),
        };
        if let Some((symbol, side)) = direction {
            lines.push(format!("📈 {} - `{}`\n", side, symbol));
        }

        for (i, tp) in order.take_profits.iter().enumerate() {
            lines.push(format!("🎯 TP{}: `{}`", i + 1, tp));
        }

        if let Some(sl) = &order.stop_loss {
            lines.push(format!("🛑 SL: `{}`", sl));
        }

        lines.join("\n")
    }
}
