//! El Enfoque crypto signals:
//!
//! ```text
//! BUY BTCUSD
//! Entry price 97100
//! SL : 96300
//! TP1 : 97250
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::tokens::{all_prices, first_price, prepare, SL_LOOSE, TP_LOOSE};
use super::{VendorFields, VendorGrammar};
use crate::model::{Side, VendorFamily};

static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(BUY|SELL)\s+([A-Z0-9]+)").expect("enfoque header pattern"));

static ENTRY_PRICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ENTRY\s+PRICE\s+([\d\.]+)").expect("enfoque entry pattern"));

pub struct EnfoqueCryptoGrammar;

impl VendorGrammar for EnfoqueCryptoGrammar {
    fn family(&self) -> VendorFamily {
        VendorFamily::EnfoqueCrypto
    }

    fn extract(&self, text: &str) -> Option<VendorFields> {
        let text = prepare(text);
        let caps = HEADER.captures(&text)?;

        let side = Side::from_token(caps.get(1)?.as_str())?;
        let symbol = caps.get(2)?.as_str().to_string();

        let entry = first_price(&ENTRY_PRICE, &text)?;
        let stop_loss = first_price(&SL_LOOSE, &text)?;
        let take_profits = all_prices(&TP_LOOSE, &text)?;
        if take_profits.is_empty() {
            return None;
        }

        Some(VendorFields::EnfoqueCrypto {
            symbol,
            side,
            entry,
            stop_loss,
            take_profits,
        })
    }
}
