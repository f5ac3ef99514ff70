//! Trade normalization and the synonym set used for matching.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Synonym -> canonical trade. Kept deliberately small; anything not in
/// the table matches by exact normalized string only.
static TRADE_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("plumber", "plumbing"),
        ("plumbing", "plumbing"),
        ("electrician", "electrical"),
        ("electrical", "electrical"),
        ("hvac", "hvac"),
        ("heating", "hvac"),
        ("cooling", "hvac"),
        ("air conditioning", "hvac"),
        ("roofer", "roofing"),
        ("roofing", "roofing"),
        ("carpenter", "carpentry"),
        ("carpentry", "carpentry"),
        ("handyman", "carpentry"),
        ("appliance", "appliance_repair"),
        ("appliance repair", "appliance_repair"),
        ("appliance_repair", "appliance_repair"),
    ])
});

/// Normalizes a trade string to its canonical form.
pub fn normalize_trade(trade: &str) -> String {
    let cleaned = trade.trim().to_lowercase();
    TRADE_SYNONYMS
        .get(cleaned.as_str())
        .map(|s| s.to_string())
        .unwrap_or(cleaned)
}

/// Whether two trade strings refer to the same trade, exactly or through
/// the synonym set.
pub fn trades_match(a: &str, b: &str) -> bool {
    normalize_trade(a) == normalize_trade(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_normalize_to_canonical_trade() {
        assert_eq!(normalize_trade("Plumber"), "plumbing");
        assert_eq!(normalize_trade("ELECTRICIAN"), "electrical");
        assert_eq!(normalize_trade("air conditioning"), "hvac");
    }

    #[test]
    fn unknown_trades_pass_through_lowercased() {
        assert_eq!(normalize_trade("  Masonry "), "masonry");
    }

    #[test]
    fn trades_match_through_synonyms() {
        assert!(trades_match("plumber", "plumbing"));
        assert!(trades_match("heating", "air conditioning"));
        assert!(!trades_match("plumbing", "electrical"));
    }
}
