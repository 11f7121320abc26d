use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::context::IdProvider;
use crate::model::VendorFamily;

/// Vendors that split one trade across an entry message and a later stop/target message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationFamily {
    Pip,
}

impl CorrelationFamily {
    pub fn of(vendor: VendorFamily) -> Option<Self> {
        match vendor {
            VendorFamily::PipEntry | VendorFamily::PipStopTarget => Some(CorrelationFamily::Pip),
            VendorFamily::PremiumForex | VendorFamily::EnfoqueCrypto => None,
        }
    }
}

/// Last issued correlation id per two-phase family.
///
/// Ids never expire: a stop/target message is stitched to whatever entry was recorded
/// last, even if that entry already had its follow-up.
pub struct CorrelationStore {
    ids: Arc<dyn IdProvider>,
    latest: RwLock<HashMap<CorrelationFamily, String>>,
}

impl CorrelationStore {
    pub fn new(ids: Arc<dyn IdProvider>) -> Self {
        Self {
            ids,
            latest: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a fresh id for `family`, superseding any previous one.
    pub fn record_entry(&self, family: CorrelationFamily) -> String {
        let id = self.ids.new_id();
        if let Some(previous) = self.latest.write().insert(family, id.clone()) {
            debug!(?family, %previous, current = %id, "correlation id superseded");
        }
        id
    }

    /// Current id for `family`, if an entry was ever recorded. Does not clear it.
    pub fn attach_if_present(&self, family: CorrelationFamily) -> Option<String> {
        self.latest.read().get(&family).cloned()
    }
}
