//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amount fallback: optional symbol, then a signed number grouped in threes
    // with an optional two-digit fraction. Group 1 is the numeric text.
    pub static ref AMOUNT_FALLBACK: Regex = Regex::new(
        r"[\$£€]?\s?(-?\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{2})?)"
    ).unwrap();

    // ISO-style dates: 2025-09-27, 2025/09/27, 2025.09.27, 2025-09-27T10:15
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})(?:\b|T)"
    ).unwrap();

    // Numeric dates with a two- or four-digit year: 09/27/2025, 27.09.25
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})([./\-])(\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    // Month name first: "Sep 27, 2025", "September 27th 2025"
    pub static ref DATE_MONTH_DAY_YEAR: Regex = Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    ).unwrap();

    // Day first: "27 Sep 2025", "27th September, 2025"
    pub static ref DATE_DAY_MONTH_YEAR: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?,?\s+(\d{4})\b"
    ).unwrap();

    // Time of day: 08:41, 8:41:05, 8:41 PM, 20:41
    pub static ref TIME_OF_DAY: Regex = Regex::new(
        r"(?i)(?:^|\D)(\d{1,2}):(\d{2})(?::(\d{2}))?(?:\s*([ap])\.?m\b\.?)?"
    ).unwrap();
}
