//! Keyword matching for receipt lines.

use lazy_static::lazy_static;
use regex::Regex;

/// Lines containing these never name the merchant.
pub const MERCHANT_EXCLUSIONS: &[&str] = &["total", "subtotal", "amount due"];

/// Lines that usually carry the amount paid.
pub const TOTAL_KEYWORDS: &[&str] = &["total", "amount due", "balance"];

pub const TAX_KEYWORDS: &[&str] = &["tax"];

pub const TIP_KEYWORDS: &[&str] = &["tip", "gratuity"];

lazy_static! {
    pub static ref MERCHANT_EXCLUSION_SET: KeywordSet = KeywordSet::new(MERCHANT_EXCLUSIONS);
    pub static ref TOTAL_SET: KeywordSet = KeywordSet::new(TOTAL_KEYWORDS);
    pub static ref TAX_SET: KeywordSet = KeywordSet::new(TAX_KEYWORDS);
    pub static ref TIP_SET: KeywordSet = KeywordSet::new(TIP_KEYWORDS);
}

/// A compiled list of keywords.
///
/// Matching is case-insensitive and bounded by word boundaries; the words of
/// a multi-word keyword may be separated by any run of whitespace.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

impl KeywordSet {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let patterns = keywords.iter().map(|k| keyword_pattern(k)).collect();

        Self { keywords, patterns }
    }

    /// Whether `line` contains any keyword of the set.
    pub fn matches(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(line))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

fn keyword_pattern(keyword: &str) -> Regex {
    let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
    let pattern = format!(r"(?i)\b{}\b", words.join(r"\s+"));
    // Every word is escaped, so the pattern is always valid.
    Regex::new(&pattern).unwrap()
}

/// Whether `line` contains any of `keywords`.
///
/// Compiles the keywords on every call; hot paths should hold a
/// [`KeywordSet`] instead.
pub fn contains_keyword<S: AsRef<str>>(line: &str, keywords: &[S]) -> bool {
    KeywordSet::new(keywords).matches(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_word_keyword() {
        assert!(contains_keyword("Amount Due: $12.00", &["amount due"]));
        assert!(contains_keyword("AMOUNT    DUE 12.00", &["amount due"]));
        assert!(contains_keyword("amount\tdue", &["amount due"]));
    }

    #[test]
    fn test_word_boundary_enforced() {
        assert!(!contains_keyword("Amountdue", &["amount due"]));
        assert!(!contains_keyword("Subtotal $12.35", &["total"]));
        assert!(!contains_keyword("Taxi fare", &["tax"]));
        assert!(!contains_keyword("Tipperary Pub", &["tip"]));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(contains_keyword("TOTAL 15.35", &["total"]));
        assert!(contains_keyword("Sales Tax 1.00", &["TAX"]));
    }

    #[test]
    fn test_keyword_tables() {
        assert!(TOTAL_SET.matches("Balance 4.00"));
        assert!(TOTAL_SET.matches("Total $15.35"));
        assert!(!TOTAL_SET.matches("Subtotal $12.35"));
        assert!(TIP_SET.matches("Gratuity 18%"));
        assert!(MERCHANT_EXCLUSION_SET.matches("Subtotal $12.35"));
        assert!(!MERCHANT_EXCLUSION_SET.matches("Blue Bottle Coffee"));
    }

    #[test]
    fn test_special_characters_are_literal() {
        let set = KeywordSet::new(&["a.b"]);
        assert!(set.matches("x a.b y"));
        assert!(!set.matches("x aXb y"));
        assert_eq!(set.keywords(), &["a.b".to_string()]);
    }

    #[test]
    fn test_empty_keywords_never_match() {
        let set = KeywordSet::new(&["", "  "]);
        assert!(!set.matches("anything"));
    }
}
