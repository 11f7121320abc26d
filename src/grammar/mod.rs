//! Vendor grammars: recognize a raw chat message as one of the supported signal
//! formats and extract its fields.

pub mod enfoque;
pub mod pip;
pub mod premium_forex;
pub(crate) mod tokens;

use crate::model::{ChannelRole, PriceText, Side, VendorFamily};

pub use enfoque::EnfoqueCryptoGrammar;
pub use pip::{PipEntryGrammar, PipStopTargetGrammar};
pub use premium_forex::PremiumForexGrammar;

/// Fields extracted by a grammar, one shape per vendor family.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorFields {
    PipEntry {
        symbol: String,
        market: String,
        side: Side,
    },
    PipStopTarget {
        stop_loss: PriceText,
        take_profits: Vec<PriceText>,
    },
    PremiumForex {
        symbol: String,
        side: Side,
        entries: Vec<PriceText>,
        stop_loss: PriceText,
        take_profits: Vec<PriceText>,
    },
    EnfoqueCrypto {
        symbol: String,
        side: Side,
        entry: PriceText,
        stop_loss: PriceText,
        take_profits: Vec<PriceText>,
    },
}

impl VendorFields {
    pub fn family(&self) -> VendorFamily {
        match self {
            VendorFields::PipEntry { .. } => VendorFamily::PipEntry,
            VendorFields::PipStopTarget { .. } => VendorFamily::PipStopTarget,
            VendorFields::PremiumForex { .. } => VendorFamily::PremiumForex,
            VendorFields::EnfoqueCrypto { .. } => VendorFamily::EnfoqueCrypto,
        }
    }
}

/// Outcome of running a message through the grammars eligible for its channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Matched {
        family: VendorFamily,
        fields: VendorFields,
    },
    NoMatch,
}

/// A recognizer/extractor pair for one vendor family.
///
/// `recognize` is derived from `extract` so the two can never disagree.
pub trait VendorGrammar: Send + Sync {
    fn family(&self) -> VendorFamily;

    /// Parse `text`, returning `None` when it is not a message of this family.
    fn extract(&self, text: &str) -> Option<VendorFields>;

    fn recognize(&self, text: &str) -> bool {
        self.extract(text).is_some()
    }
}

static PIP_ENTRY: PipEntryGrammar = PipEntryGrammar;
static PIP_STOP_TARGET: PipStopTargetGrammar = PipStopTargetGrammar;
static PREMIUM_FOREX: PremiumForexGrammar = PremiumForexGrammar;
static ENFOQUE_CRYPTO: EnfoqueCryptoGrammar = EnfoqueCryptoGrammar;

pub fn grammar(family: VendorFamily) -> &'static dyn VendorGrammar {
    match family {
        VendorFamily::PipEntry => &PIP_ENTRY,
        VendorFamily::PipStopTarget => &PIP_STOP_TARGET,
        VendorFamily::PremiumForex => &PREMIUM_FOREX,
        VendorFamily::EnfoqueCrypto => &ENFOQUE_CRYPTO,
    }
}

/// Grammars tried for a channel, in order. First success wins.
pub fn grammars_for(role: ChannelRole) -> &'static [VendorFamily] {
    match role {
        ChannelRole::Pips => &[VendorFamily::PipEntry, VendorFamily::PipStopTarget],
        ChannelRole::Forex => &[VendorFamily::PremiumForex],
        ChannelRole::Crypto => &[VendorFamily::EnfoqueCrypto],
        ChannelRole::Target => &VendorFamily::ALL,
    }
}

pub fn classify(role: ChannelRole, text: &str) -> Classification {
    grammars_for(role)
        .iter()
        .find_map(|family| {
            grammar(*family)
                .extract(text)
                .map(|fields| Classification::Matched {
                    family: *family,
                    fields,
                })
        })
        .unwrap_or(Classification::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = "US100 (NASDAQ) BUY PUSH";
    const STOP_TARGET: &str = "TP1=100.5 TP2=101.2 SL=99.0";
    const FOREX: &str = "GUYS GOLD SELL NOW 3280 SL=3300 TP1=3250";
    const FOREX_COLON: &str = "GUYS GOLD SELL NOW 3280 SL: 3300 TP1: 3250";
    const CRYPTO: &str = "BUY BTCUSD\nEntry price 97100\nSL: 96300\nTP1: 97250\nTP2: 97400";

    fn matched_family(role: ChannelRole, text: &str) -> Option<VendorFamily> {
        match classify(role, text) {
            Classification::Matched { family, fields } => {
                assert_eq!(family, fields.family());
                Some(family)
            }
            Classification::NoMatch => None,
        }
    }

    #[test]
    fn grammar_lookup_matches_family() {
        for family in VendorFamily::ALL {
            assert_eq!(grammar(family).family(), family);
        }
    }

    #[test]
    fn dedicated_channels_only_try_their_vendor() {
        assert_eq!(matched_family(ChannelRole::Pips, ENTRY), Some(VendorFamily::PipEntry));
        assert_eq!(
            matched_family(ChannelRole::Pips, STOP_TARGET),
            Some(VendorFamily::PipStopTarget)
        );
        assert_eq!(matched_family(ChannelRole::Pips, FOREX_COLON), None);
        assert_eq!(matched_family(ChannelRole::Forex, CRYPTO), None);
        assert_eq!(matched_family(ChannelRole::Crypto, FOREX), None);
        assert_eq!(matched_family(ChannelRole::Forex, FOREX), Some(VendorFamily::PremiumForex));
        assert_eq!(
            matched_family(ChannelRole::Crypto, CRYPTO),
            Some(VendorFamily::EnfoqueCrypto)
        );
    }

    #[test]
    fn target_channel_accepts_every_vendor() {
        assert_eq!(matched_family(ChannelRole::Target, ENTRY), Some(VendorFamily::PipEntry));
        assert_eq!(
            matched_family(ChannelRole::Target, STOP_TARGET),
            Some(VendorFamily::PipStopTarget)
        );
        assert_eq!(
            matched_family(ChannelRole::Target, FOREX_COLON),
            Some(VendorFamily::PremiumForex)
        );
        assert_eq!(
            matched_family(ChannelRole::Target, CRYPTO),
            Some(VendorFamily::EnfoqueCrypto)
        );
    }

    #[test]
    fn chatter_matches_nothing() {
        let chatter = [
            "good morning traders",
            "",
            "   ",
            "US100 looking strong today",
            "TP1 hit! congrats",
        ];
        for text in chatter {
            for family in VendorFamily::ALL {
                assert!(!grammar(family).recognize(text), "{family} matched {text:?}");
            }
            assert_eq!(classify(ChannelRole::Target, text), Classification::NoMatch);
        }
    }

    #[test]
    fn target_order_prefers_pip_stop_target_over_forex() {
        // Satisfies both the Pip stop/target and the Premium Forex shapes.
        let text = "GOLD SELL NOW 3280 SL=3300 TP1=3250";
        assert_eq!(
            matched_family(ChannelRole::Target, text),
            Some(VendorFamily::PipStopTarget)
        );
        assert_eq!(matched_family(ChannelRole::Pips, text), Some(VendorFamily::PipStopTarget));
        assert_eq!(matched_family(ChannelRole::Forex, text), Some(VendorFamily::PremiumForex));
    }
}
