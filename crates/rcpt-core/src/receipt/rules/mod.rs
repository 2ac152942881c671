//! Rule-based field detection for receipts.

pub mod amounts;
pub mod currency;
pub mod dates;
pub mod keywords;
pub mod locale;
pub mod patterns;

pub use amounts::{format_amount, parse_amount, parse_currency_style};
pub use currency::{detect_currency, detect_currency_code, Currency};
pub use dates::{detect_date, parse_date_in_line};
pub use keywords::{
    contains_keyword, KeywordSet, MERCHANT_EXCLUSIONS, TAX_KEYWORDS, TIP_KEYWORDS, TOTAL_KEYWORDS,
};
pub use locale::{LocaleFormat, SymbolPosition, KNOWN_LOCALES};

