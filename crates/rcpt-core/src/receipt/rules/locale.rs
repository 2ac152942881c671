//! Monetary locale descriptors.

use serde::{Deserialize, Serialize};

use super::currency::Currency;

/// Where a locale places the currency symbol relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    /// "$1,234.56"
    Prefix,
    /// "1.234,56 €"
    Suffix,
}

/// Separators and currency conventions used to read and write amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleFormat {
    pub identifier: &'static str,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub currency_symbol: &'static str,
    pub currency_code: &'static str,
    pub symbol_position: SymbolPosition,
}

const fn locale(
    identifier: &'static str,
    decimal_separator: char,
    grouping_separator: char,
    currency_symbol: &'static str,
    currency_code: &'static str,
    symbol_position: SymbolPosition,
) -> LocaleFormat {
    LocaleFormat {
        identifier,
        decimal_separator,
        grouping_separator,
        currency_symbol,
        currency_code,
        symbol_position,
    }
}

pub const EN_US: LocaleFormat = locale("en_US", '.', ',', "$", "USD", SymbolPosition::Prefix);
pub const EN_GB: LocaleFormat = locale("en_GB", '.', ',', "£", "GBP", SymbolPosition::Prefix);
pub const EN_IE: LocaleFormat = locale("en_IE", '.', ',', "€", "EUR", SymbolPosition::Prefix);
pub const DE_DE: LocaleFormat = locale("de_DE", ',', '.', "€", "EUR", SymbolPosition::Suffix);
pub const FR_FR: LocaleFormat = locale("fr_FR", ',', '\u{202f}', "€", "EUR", SymbolPosition::Suffix);
pub const ES_ES: LocaleFormat = locale("es_ES", ',', '.', "€", "EUR", SymbolPosition::Suffix);
pub const IT_IT: LocaleFormat = locale("it_IT", ',', '.', "€", "EUR", SymbolPosition::Suffix);
pub const NL_NL: LocaleFormat = locale("nl_NL", ',', '.', "€", "EUR", SymbolPosition::Prefix);

/// All built-in locales, in lookup order.
pub const KNOWN_LOCALES: [LocaleFormat; 8] = [EN_US, EN_GB, EN_IE, DE_DE, FR_FR, ES_ES, IT_IT, NL_NL];

impl LocaleFormat {
    /// Resolve a POSIX or BCP 47 style identifier.
    ///
    /// Accepts `de_DE`, `de-DE`, `de_DE.UTF-8`, `de_DE@euro` and bare
    /// languages such as `de`. Unknown identifiers resolve to `en_US`.
    pub fn from_identifier(identifier: &str) -> Self {
        let base = identifier
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim()
            .replace('-', "_");

        if let Some(found) = KNOWN_LOCALES
            .iter()
            .find(|l| l.identifier.eq_ignore_ascii_case(&base))
        {
            return *found;
        }

        let language = base.split('_').next().unwrap_or_default().to_ascii_lowercase();
        KNOWN_LOCALES
            .iter()
            .find(|l| l.identifier.starts_with(&format!("{}_", language)))
            .copied()
            .unwrap_or(EN_US)
    }

    /// Locale used for parsing once a currency has been detected.
    ///
    /// A currency-only locale keeps `.` as its decimal separator, so euro
    /// amounts are read with Irish conventions rather than continental ones.
    pub fn for_currency(currency: Currency) -> Self {
        match currency {
            Currency::Usd => EN_US,
            Currency::Gbp => EN_GB,
            Currency::Eur => EN_IE,
        }
    }

    /// The process locale, from `LC_ALL`, `LC_MONETARY` or `LANG`.
    pub fn from_env() -> Self {
        ["LC_ALL", "LC_MONETARY", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty() && value != "C" && value != "POSIX")
            .map(|value| Self::from_identifier(&value))
            .unwrap_or(EN_US)
    }
}

impl Default for LocaleFormat {
    fn default() -> Self {
        EN_US
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_identifier_variants() {
        assert_eq!(LocaleFormat::from_identifier("de_DE"), DE_DE);
        assert_eq!(LocaleFormat::from_identifier("de-DE"), DE_DE);
        assert_eq!(LocaleFormat::from_identifier("de_DE.UTF-8"), DE_DE);
        assert_eq!(LocaleFormat::from_identifier("fr_FR@euro"), FR_FR);
        assert_eq!(LocaleFormat::from_identifier("en_gb"), EN_GB);
    }

    #[test]
    fn test_from_identifier_language_only() {
        assert_eq!(LocaleFormat::from_identifier("it"), IT_IT);
        assert_eq!(LocaleFormat::from_identifier("en"), EN_US);
    }

    #[test]
    fn test_unknown_identifier_falls_back() {
        assert_eq!(LocaleFormat::from_identifier("xx_YY"), EN_US);
        assert_eq!(LocaleFormat::from_identifier(""), EN_US);
    }

    #[test]
    fn test_for_currency() {
        assert_eq!(LocaleFormat::for_currency(Currency::Usd).currency_code, "USD");
        assert_eq!(LocaleFormat::for_currency(Currency::Gbp).currency_code, "GBP");
        let eur = LocaleFormat::for_currency(Currency::Eur);
        assert_eq!(eur.currency_code, "EUR");
        assert_eq!(eur.decimal_separator, '.');
    }
}
