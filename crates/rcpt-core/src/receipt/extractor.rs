//! Field candidate extraction over recognized receipt lines.

use rust_decimal::Decimal;
use tracing::debug;

use super::rules::keywords::{MERCHANT_EXCLUSION_SET, TAX_SET, TIP_SET, TOTAL_SET};
use super::rules::{detect_currency, detect_date, parse_amount, KeywordSet, LocaleFormat};
use super::CandidateExtractor;
use crate::models::candidates::FieldCandidates;

/// Rule-based receipt extractor.
///
/// Amounts are parsed under the locale of the detected currency; when no
/// currency symbol is present the fallback locale is used.
#[derive(Debug, Clone)]
pub struct ReceiptExtractor {
    fallback_locale: LocaleFormat,
}

impl ReceiptExtractor {
    /// Create an extractor that falls back to the process locale.
    pub fn new() -> Self {
        Self {
            fallback_locale: LocaleFormat::from_env(),
        }
    }

    /// Use `locale` when no currency symbol is found.
    pub fn with_locale(mut self, locale: LocaleFormat) -> Self {
        self.fallback_locale = locale;
        self
    }

    pub fn fallback_locale(&self) -> &LocaleFormat {
        &self.fallback_locale
    }

    fn merchant_name(lines: &[String]) -> Option<String> {
        lines
            .iter()
            .find(|line| !line.is_empty() && !MERCHANT_EXCLUSION_SET.matches(line))
            .cloned()
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateExtractor for ReceiptExtractor {
    fn extract(&self, lines: &[String]) -> FieldCandidates {
        let lines: Vec<String> = lines.iter().map(|l| l.trim().to_string()).collect();

        let currency = detect_currency(&lines);
        let locale = currency
            .map(LocaleFormat::for_currency)
            .unwrap_or(self.fallback_locale);
        debug!(
            "Parsing amounts with locale {} (currency: {:?})",
            locale.identifier, currency
        );

        let candidates = FieldCandidates {
            merchant_name: Self::merchant_name(&lines),
            purchase_date: detect_date(&lines),
            total_amount: detect_amount(&lines, &TOTAL_SET, &locale),
            tax_amount: detect_amount(&lines, &TAX_SET, &locale),
            tip_amount: detect_amount(&lines, &TIP_SET, &locale),
            currency_code: currency.map(|c| c.code().to_string()),
        };

        debug!("Detected fields: {:?}", candidates.detected_fields());
        candidates
    }
}

/// Two-pass amount search.
///
/// Lines matching `keywords` are scanned first, in order, for a parsable
/// amount. When none yields one, every line is scanned regardless of
/// keyword, which may pick an unrelated number such as a quantity.
pub fn detect_amount<S: AsRef<str>>(
    lines: &[S],
    keywords: &KeywordSet,
    locale: &LocaleFormat,
) -> Option<Decimal> {
    let prioritized = lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| keywords.matches(line))
        .find_map(|line| parse_amount(line, locale));

    if let Some(amount) = prioritized {
        debug!("Amount {} found on a {:?} line", amount, keywords.keywords());
        return Some(amount);
    }

    let fallback = lines
        .iter()
        .find_map(|line| parse_amount(line.as_ref(), locale));
    if let Some(amount) = fallback {
        debug!("No {:?} line parsed, using first amount {}", keywords.keywords(), amount);
    }
    fallback
}
