// src/sources/isin.rs
use std::collections::HashMap;

use once_cell::sync::Lazy;

// The data site only searches by ticker, so ISINs are resolved locally.
static ISIN_TO_TICKER: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("US0378331005", "AAPL"),  // Apple
        ("US5949181045", "MSFT"),  // Microsoft
        ("US0231351067", "AMZN"),  // Amazon
        ("US3696041013", "GOOG"),  // Alphabet
        ("US88160R1014", "TSLA"),  // Tesla
        ("DE000BASF111", "BASF"),  // BASF
        ("IT0005238287", "ENI"),   // ENI
        ("IE00B1FL5M68", "RYAAY"), // Ryanair Holdings (ADR)
    ])
});

/// Ticker mapped to `isin`, if known. Case and surrounding whitespace are ignored.
pub fn ticker_for_isin(isin: &str) -> Option<&'static str> {
    ISIN_TO_TICKER
        .get(isin.trim().to_uppercase().as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_isin() {
        assert_eq!(ticker_for_isin("US0378331005"), Some("AAPL"));
        assert_eq!(ticker_for_isin(" ie00b1fl5m68 "), Some("RYAAY"));
    }

    #[test]
    fn test_unknown_isin() {
        assert_eq!(ticker_for_isin("XS0000000000"), None);
        assert_eq!(ticker_for_isin(""), None);
    }
}
