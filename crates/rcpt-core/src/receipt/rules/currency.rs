//! Currency detection from receipt symbols.

use serde::{Deserialize, Serialize};

/// Currencies recognized by their symbol on a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

/// Detection order. The first symbol found anywhere in the lines wins.
const PRIORITY: [Currency; 3] = [Currency::Eur, Currency::Gbp, Currency::Usd];

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Detect the receipt currency from symbol presence.
///
/// `€` beats `£` beats `$`, regardless of where or how often each appears.
/// Textual codes ("USD", "dollars") are not considered.
pub fn detect_currency<S: AsRef<str>>(lines: &[S]) -> Option<Currency> {
    PRIORITY.into_iter().find(|currency| {
        lines
            .iter()
            .any(|line| line.as_ref().contains(currency.symbol()))
    })
}

/// Detect the receipt currency and return its ISO code.
pub fn detect_currency_code<S: AsRef<str>>(lines: &[S]) -> Option<&'static str> {
    detect_currency(lines).map(|c| c.code())
}
