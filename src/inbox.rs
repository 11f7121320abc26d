use parking_lot::Mutex;
use tracing::warn;

use crate::metrics;
use crate::model::{CanonicalOrder, VendorFamily};

/// One pending signal per vendor category between the relay (writer) and the
/// execution client's poll handler (reader).
///
/// Publishing overwrites whatever was not yet consumed; taking clears the slot under
/// the same lock, so a signal is served at most once.
pub struct SignalInbox {
    slots: [Mutex<Option<CanonicalOrder>>; 4],
}

impl Default for SignalInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalInbox {
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
        }
    }

    pub fn publish(&self, category: VendorFamily, order: CanonicalOrder) {
        let replaced = self.slots[category.slot()].lock().replace(order);
        if let Some(stale) = replaced {
            warn!(
                vendor = %category,
                dropped_signal_id = stale.correlation_id.as_deref().unwrap_or("-"),
                "Unconsumed signal overwritten by a newer one"
            );
            metrics::inc_signals_coalesced(category);
        }
    }

    pub fn take_latest(&self, category: VendorFamily) -> Option<CanonicalOrder> {
        self.slots[category.slot()].lock().take()
    }

    /// Number of categories currently holding a signal.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|slot| slot.lock().is_some()).count()
    }
}
