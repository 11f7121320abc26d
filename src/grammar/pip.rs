//! Mr Pips: a two-phase vendor. The entry arrives first as a one-liner
//! (`US100 (NASDAQ) BUY PUSH`), the stop/targets later in a separate message.

use once_cell::sync::Lazy;
use regex::Regex;

use super::tokens::{all_prices, first_price, prepare, SL_EQUALS, TP_EQUALS};
use super::{VendorFields, VendorGrammar};
use crate::model::{Side, VendorFamily};

const ENTRY_SYMBOLS: [&str; 2] = ["US100", "XAUUSD"];

static ENTRY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z0-9]+)\s*\(([A-Z\s]+)\)\s+(BUY|SELL)\s+PUSH$").expect("pip entry pattern")
});

pub struct PipEntryGrammar;

impl VendorGrammar for PipEntryGrammar {
    fn family(&self) -> VendorFamily {
        VendorFamily::PipEntry
    }

    fn extract(&self, text: &str) -> Option<VendorFields> {
        let text = prepare(text);
        let caps = ENTRY_LINE.captures(&text)?;

        let symbol = caps.get(1)?.as_str();
        if !ENTRY_SYMBOLS.contains(&symbol) {
            return None;
        }

        Some(VendorFields::PipEntry {
            symbol: symbol.to_string(),
            market: caps.get(2)?.as_str().trim().to_string(),
            side: Side::from_token(caps.get(3)?.as_str())?,
        })
    }
}

pub struct PipStopTargetGrammar;

impl VendorGrammar for PipStopTargetGrammar {
    fn family(&self) -> VendorFamily {
        VendorFamily::PipStopTarget
    }

    fn extract(&self, text: &str) -> Option<VendorFields> {
        let text = prepare(text);

        let take_profits = all_prices(&TP_EQUALS, &text)?;
        if take_profits.is_empty() {
            return None;
        }
        let stop_loss = first_price(&SL_EQUALS, &text)?;

        Some(VendorFields::PipStopTarget {
            stop_loss,
            take_profits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(fields: &VendorFields) -> (Vec<&str>, &str) {
        match fields {
            VendorFields::PipStopTarget {
                stop_loss,
                take_profits,
            } => (
                take_profits.iter().map(|p| p.as_str()).collect(),
                stop_loss.as_str(),
            ),
            other => panic!("unexpected fields {:?}", other),
        }
    }

    #[test]
    fn entry_line_matches_allowed_symbol() {
        let fields = PipEntryGrammar.extract("US100 (NASDAQ) BUY PUSH").unwrap();
        assert_eq!(
            fields,
            VendorFields::PipEntry {
                symbol: "US100".into(),
                market: "NASDAQ".into(),
                side: Side::Buy,
            }
        );
    }

    #[test]
    fn entry_line_is_case_insensitive_and_trimmed() {
        let fields = PipEntryGrammar.extract("  xauusd(gold spot) sell push\n").unwrap();
        match fields {
            VendorFields::PipEntry {
                symbol,
                market,
                side,
            } => {
                assert_eq!(symbol, "XAUUSD");
                assert_eq!(market, "GOLD SPOT");
                assert_eq!(side, Side::Sell);
            }
            other => panic!("unexpected fields {:?}", other),
        }
    }

    #[test]
    fn entry_line_rejects_other_symbols() {
        assert!(!PipEntryGrammar.recognize("EURUSD (FOREX) BUY PUSH"));
    }

    #[test]
    fn entry_line_is_anchored() {
        assert!(!PipEntryGrammar.recognize("NEW: US100 (NASDAQ) BUY PUSH"));
        assert!(!PipEntryGrammar.recognize("US100 (NASDAQ) BUY PUSH NOW"));
        assert!(!PipEntryGrammar.recognize("US100 NASDAQ BUY PUSH"));
    }

    #[test]
    fn stop_target_extracts_ordered_targets() {
        let fields = PipStopTargetGrammar
            .extract("TP1=100.5 TP2=101.2 SL=99.0")
            .unwrap();
        let (tps, sl) = prices(&fields);
        assert_eq!(tps, vec!["100.5", "101.2"]);
        assert_eq!(sl, "99.0");
    }

    #[test]
    fn stop_target_tolerates_noise_and_spacing() {
        let fields = PipStopTargetGrammar
            .extract("update guys\nsl = 21010\ntp1 = 21100\ntp2 = 21150\ngood luck")
            .unwrap();
        let (tps, sl) = prices(&fields);
        assert_eq!(tps, vec!["21100", "21150"]);
        assert_eq!(sl, "21010");
    }

    #[test]
    fn stop_target_requires_both_sides() {
        assert!(!PipStopTargetGrammar.recognize("TP1=100.5"));
        assert!(!PipStopTargetGrammar.recognize("SL=99.0"));
        // TP needs an index digit in this vendor's format
        assert!(!PipStopTargetGrammar.recognize("TP=100.5 SL=99.0"));
    }

    #[test]
    fn stop_target_rejects_malformed_prices() {
        for text in ["TP1=-5 SL=99", "TP1=5 SL=-99", "TP1=abc SL=1"] {
            assert!(PipStopTargetGrammar.extract(text).is_none(), "{text}");
        }
    }
}
