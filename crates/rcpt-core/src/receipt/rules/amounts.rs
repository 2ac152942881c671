//! Amount parsing for receipts.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::locale::{LocaleFormat, SymbolPosition};
use super::patterns::AMOUNT_FALLBACK;

/// Parse a monetary amount out of a text fragment.
///
/// Whitespace is removed first. A strict currency-style parse under `locale`
/// is tried, then the fallback pattern, whose first match is normalized and
/// read as a decimal. Returns `None` when nothing parses, or when the whole
/// fragment is a well-formed number that `Decimal` cannot hold exactly.
pub fn parse_amount(text: &str, locale: &LocaleFormat) -> Option<Decimal> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    match strict_parse(&cleaned, locale) {
        StrictParse::Exact(amount) => return Some(amount),
        StrictParse::Unrepresentable => return None,
        StrictParse::NotAnAmount => {}
    }

    let caps = AMOUNT_FALLBACK.captures(&cleaned)?;
    let matched = caps.get(1)?.as_str();

    let normalized = if locale.decimal_separator != '.' {
        matched.replace(',', ".")
    } else {
        matched.replace(',', "")
    };

    Decimal::from_str(&normalized).ok().or_else(|| {
        Decimal::from_str(&normalized.replace(locale.decimal_separator, ".")).ok()
    })
}

/// Strict currency-style parse of a whole fragment.
///
/// Accepts an optional sign, an optional currency symbol or ISO code on
/// either side, grouping in blocks of three and one decimal separator.
/// Any other character makes the parse fail, as does a value with more
/// digits than `Decimal` holds exactly.
pub fn parse_currency_style(text: &str, locale: &LocaleFormat) -> Option<Decimal> {
    match strict_parse(text, locale) {
        StrictParse::Exact(amount) => Some(amount),
        StrictParse::Unrepresentable | StrictParse::NotAnAmount => None,
    }
}

enum StrictParse {
    Exact(Decimal),
    /// Well-formed, but too many digits to represent without rounding.
    Unrepresentable,
    NotAnAmount,
}

fn strict_parse(text: &str, locale: &LocaleFormat) -> StrictParse {
    let mut body = text;
    let mut negative = false;

    if let Some(rest) = body.strip_prefix('-') {
        negative = true;
        body = rest;
    }

    body = strip_currency_marker(body, locale);

    if !negative {
        if let Some(rest) = body.strip_prefix('-') {
            negative = true;
            body = rest;
        }
    }

    let Some(plain) = normalize_grouped(body, locale) else {
        return StrictParse::NotAnAmount;
    };
    let scale = plain.split_once('.').map_or(0, |(_, fraction)| fraction.len());

    match Decimal::from_str(&plain) {
        // from_str rounds excess fractional digits instead of failing
        Ok(amount) if amount.scale() as usize == scale => {
            StrictParse::Exact(if negative { -amount } else { amount })
        }
        _ => StrictParse::Unrepresentable,
    }
}

fn strip_currency_marker<'a>(text: &'a str, locale: &LocaleFormat) -> &'a str {
    for marker in [locale.currency_symbol, locale.currency_code] {
        if let Some(rest) = text.strip_prefix(marker) {
            return rest;
        }
        if let Some(rest) = text.strip_suffix(marker) {
            return rest;
        }
    }
    text
}

/// Turn "1.234,56" (under `locale`) into "1234.56", validating grouping.
fn normalize_grouped(body: &str, locale: &LocaleFormat) -> Option<String> {
    let (integer, fraction) = match body.split_once(locale.decimal_separator) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (body, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    let mut plain = String::with_capacity(body.len());
    if integer.contains(locale.grouping_separator) {
        let mut groups = integer.split(locale.grouping_separator);
        let first = groups.next()?;
        if !all_digits(first) || first.len() > 3 {
            return None;
        }
        plain.push_str(first);
        for group in groups {
            if group.len() != 3 || !all_digits(group) {
                return None;
            }
            plain.push_str(group);
        }
    } else {
        if !all_digits(integer) {
            return None;
        }
        plain.push_str(integer);
    }

    if let Some(fraction) = fraction {
        if !all_digits(fraction) {
            return None;
        }
        plain.push('.');
        plain.push_str(fraction);
    }

    Some(plain)
}

/// Format an amount currency-style under `locale`, keeping its scale.
pub fn format_amount(amount: Decimal, locale: &LocaleFormat) -> String {
    let plain = amount.abs().to_string();
    let (integer_part, fraction_part) = match plain.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (plain.as_str(), None),
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut number = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            number.push(locale.grouping_separator);
        }
        number.push(*c);
    }

    if let Some(fraction) = fraction_part {
        number.push(locale.decimal_separator);
        number.push_str(fraction);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };

    match locale.symbol_position {
        SymbolPosition::Prefix => format!("{}{}{}", sign, locale.currency_symbol, number),
        SymbolPosition::Suffix => format!("{}{}\u{a0}{}", sign, number, locale.currency_symbol),
    }
}
