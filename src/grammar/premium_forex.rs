//! VIP Premium Forex: single-message signals with a loose header such as
//! `GUYS GOLD SELL NOW 3280` or `US30 SELL 41030/41050`, followed by SL and TP lines.

use once_cell::sync::Lazy;
use regex::Regex;

use super::tokens::{all_prices, first_price, prepare, SL_LOOSE, TP_LOOSE_BOUNDED};
use super::{VendorFields, VendorGrammar};
use crate::model::{PriceText, Side, VendorFamily};

const HEADER_SYMBOLS: [&str; 4] = ["US30", "GOLD", "BTC", "XAU"];

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\b\w+\b\s+)*([A-Z0-9]+)\s+(BUY|SELL)(?:\s+NOW)?(?:\s+\w+)*\s+([\d\.]+(?:\s*/\s*[\d\.]+)?)",
    )
    .expect("premium forex header pattern")
});

fn canonical_symbol(raw: &str) -> &str {
    match raw {
        "GOLD" | "XAU" => "XAUUSD",
        "BTC" => "BTCUSD",
        other => other,
    }
}

pub struct PremiumForexGrammar;

impl VendorGrammar for PremiumForexGrammar {
    fn family(&self) -> VendorFamily {
        VendorFamily::PremiumForex
    }

    fn extract(&self, text: &str) -> Option<VendorFields> {
        let text = prepare(text);
        let caps = HEADER.captures(&text)?;

        let raw_symbol = caps.get(1)?.as_str();
        if !HEADER_SYMBOLS.contains(&raw_symbol) {
            return None;
        }
        let side = Side::from_token(caps.get(2)?.as_str())?;

        let entries = caps
            .get(3)?
            .as_str()
            .split('/')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PriceText::parse)
            .collect::<Option<Vec<_>>>()?;

        let stop_loss = first_price(&SL_LOOSE, &text)?;
        let take_profits = all_prices(&TP_LOOSE_BOUNDED, &text)?;
        if take_profits.is_empty() {
            return None;
        }

        Some(VendorFields::PremiumForex {
            symbol: canonical_symbol(raw_symbol).to_string(),
            side,
            entries,
            stop_loss,
            take_profits,
        })
    }
}
