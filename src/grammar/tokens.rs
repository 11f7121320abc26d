//! Token patterns shared by more than one vendor grammar.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::PriceText;

/// `SL = 99.0` (strict `=` form used by the Pip stop/target message)
pub(crate) static SL_EQUALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bSL\s*=\s*([\d\.]+)").expect("sl equals pattern"));

/// `TP1 = 100.5`, single digit index required
pub(crate) static TP_EQUALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"TP\d\s*=\s*([\d\.]+)").expect("tp equals pattern"));

/// `SL: 3300`, `SL=3300`, `SL 3300`
pub(crate) static SL_LOOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bSL\s*[:=]?\s*([\d\.]+)").expect("sl loose pattern"));

/// `TP1: 3250`, `TP=3250`, `TP 3250`, word-bounded on the left
pub(crate) static TP_LOOSE_BOUNDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bTP\d*\s*[:=]?\s*([\d\.]+)").expect("tp bounded pattern"));

/// Same as [`TP_LOOSE_BOUNDED`] without the left word boundary, so emoji-glued
/// markers like `🎯TP1` still match.
pub(crate) static TP_LOOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"TP\d*\s*[:=]?\s*([\d\.]+)").expect("tp loose pattern"));

/// All matching is done on a trimmed, uppercased copy of the message.
pub(crate) fn prepare(text: &str) -> String {
    text.trim().to_uppercase()
}

pub(crate) fn first_price(pattern: &Regex, text: &str) -> Option<PriceText> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| PriceText::parse(m.as_str()))
}

/// Every capture in order of appearance. A single malformed token voids the whole list.
pub(crate) fn all_prices(pattern: &Regex, text: &str) -> Option<Vec<PriceText>> {
    pattern
        .captures_iter(text)
        .map(|caps| caps.get(1).and_then(|m| PriceText::parse(m.as_str())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_trims_and_uppercases() {
        assert_eq!(prepare("  gold sell now 3280 \n"), "GOLD SELL NOW 3280");
    }

    #[test]
    fn all_prices_keeps_order_and_duplicates() {
        let prices = all_prices(&TP_EQUALS, "TP2=5 TP1=3 TP3=5").unwrap();
        let raw: Vec<&str> = prices.iter().map(|p| p.as_str()).collect();
        assert_eq!(raw, vec!["5", "3", "5"]);
    }

    #[test]
    fn sl_loose_accepts_separators() {
        for text in ["SL: 3300", "SL=3300", "SL 3300", "🛑SL : 3300"] {
            assert_eq!(first_price(&SL_LOOSE, text).unwrap().as_str(), "3300", "{text}");
        }
    }

    #[test]
    fn sl_requires_word_boundary() {
        assert!(first_price(&SL_LOOSE, "BSL 3300").is_none());
        assert!(first_price(&SL_EQUALS, "XSL=1").is_none());
    }
}
