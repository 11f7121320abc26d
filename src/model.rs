use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl Side {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "BUY" => Some(Side::Buy),
            "SELL" => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message family a signal was recognized as. Doubles as the inbox category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VendorFamily {
    #[serde(rename = "pip")]
    PipEntry,
    #[serde(rename = "pipsltp")]
    PipStopTarget,
    // Wire tag kept as the execution client already expects it.
    #[serde(rename = "premiun_forex")]
    PremiumForex,
    #[serde(rename = "enfoque_btc")]
    EnfoqueCrypto,
}

impl VendorFamily {
    pub const ALL: [VendorFamily; 4] = [
        VendorFamily::PipEntry,
        VendorFamily::PipStopTarget,
        VendorFamily::PremiumForex,
        VendorFamily::EnfoqueCrypto,
    ];

    pub fn slot(&self) -> usize {
        match self {
            VendorFamily::PipEntry => 0,
            VendorFamily::PipStopTarget => 1,
            VendorFamily::PremiumForex => 2,
            VendorFamily::EnfoqueCrypto => 3,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            VendorFamily::PipEntry => "pip",
            VendorFamily::PipStopTarget => "pipsltp",
            VendorFamily::PremiumForex => "premiun_forex",
            VendorFamily::EnfoqueCrypto => "enfoque_btc",
        }
    }

    /// Path the execution client polls for this category.
    pub fn poll_path(&self) -> &'static str {
        match self {
            VendorFamily::PipEntry => "/mt5/mrpip/execute",
            VendorFamily::PipStopTarget => "/mt5/mrpip/sltp",
            VendorFamily::PremiumForex => "/mt5/forexpremium/execute",
            VendorFamily::EnfoqueCrypto => "/mt5/btc/execute",
        }
    }
}

impl fmt::Display for VendorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Identity of a watched chat channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    /// Shared confirmation channel; eligible for every grammar.
    Target,
    Pips,
    Forex,
    Crypto,
}

/// A price exactly as it appeared in the source text (digits and dots only).
///
/// Kept as text so no float rounding is introduced between the chat message and the
/// execution client, which picks its own numeric parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceText(String);

impl PriceText {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit() || c == '.') {
            Some(PriceText(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PriceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized trading instruction served to the execution client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(rename = "entry", default, skip_serializing_if = "Vec::is_empty")]
    pub entry_prices: Vec<PriceText>,
    #[serde(rename = "sl", default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<PriceText>,
    #[serde(rename = "tps", default, skip_serializing_if = "Vec::is_empty")]
    pub take_profits: Vec<PriceText>,
    pub vendor: VendorFamily,
    #[serde(rename = "signal_id", default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub t_signal: i64,
}

impl CanonicalOrder {
    /// Symbol and side, when both are known.
    pub fn direction(&self) -> Option<(&str, Side)> {
        match (&self.symbol, self.side) {
            (Some(symbol), Some(side)) => Some((symbol.as_str(), side)),
            _ => None,
        }
    }
}
