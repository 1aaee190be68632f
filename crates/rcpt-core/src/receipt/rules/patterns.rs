//! Common regex patterns and keyword tables for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amount patterns (US format: 1,234.56; tolerates comma decimals from
    // European receipts and OCR-mangled thousands separators)
    pub static ref AMOUNT: Regex = Regex::new(
        r"(?:\d{1,3}(?:[, ]\d{3})+|\d+)[.,]\d{2}\b"
    ).unwrap();

    // Numeric dates: MM/DD/YYYY or DD/MM/YYYY (also - and . separators)
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4}|\d{2})\b"
    ).unwrap();

    // ISO dates: YYYY-MM-DD
    pub static ref DATE_ISO: Regex = Regex::new(
        r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"
    ).unwrap();

    // Textual dates: "December 15, 2023" / "Dec 15 2023"
    pub static ref DATE_TEXTUAL: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})"
    ).unwrap();

    // 12-hour clock: "3:45 PM"
    pub static ref TIME_12H: Regex = Regex::new(
        r"(?i)\b(\d{1,2}):([0-5]\d)(?::([0-5]\d))?\s*(am|pm)\b"
    ).unwrap();

    // 24-hour clock: "15:45" or "15:45:30"
    pub static ref TIME_24H: Regex = Regex::new(
        r"\b([01]?\d|2[0-3]):([0-5]\d)(?::([0-5]\d))?\b"
    ).unwrap();

    // Receipt/transaction number, labeled. The captured token must lead
    // with a digit so prose after the keyword is not mistaken for an id.
    pub static ref RECEIPT_NUMBER: Regex = Regex::new(
        r"(?i)(?:receipt|rcpt|trans(?:action)?|order|ref|invoice)\s*(?:no|num|number|id)?\s*[.:#]*\s*(\d[A-Za-z0-9-]{2,23})"
    ).unwrap();

    // Quantity markers: "2x Item", "Item x3", "qty 5"
    pub static ref QUANTITY_PREFIX: Regex = Regex::new(
        r"(?i)^(\d{1,3})\s*x\b"
    ).unwrap();

    pub static ref QUANTITY_SUFFIX: Regex = Regex::new(
        r"(?i)\bx\s*(\d{1,3})\b"
    ).unwrap();

    pub static ref QUANTITY_LABEL: Regex = Regex::new(
        r"(?i)\bqty\.?\s*:?\s*(\d{1,3})\b"
    ).unwrap();

    // Token of letters that mixes upper and lower case (brand-like)
    pub static ref MIXED_CASE_TOKEN: Regex = Regex::new(
        r"\b[A-Z][a-z]+[A-Za-z]*\b"
    ).unwrap();
}

// Keyword sets, all lowercase (matched against lowercase views).

/// Lines anchoring the grand total.
pub const TOTAL_KEYWORDS: &[&str] = &["grand total", "amount due", "balance due", "total", "balance"];

/// Lines anchoring the subtotal. Checked before total keywords since
/// "subtotal" contains "total".
pub const SUBTOTAL_KEYWORDS: &[&str] = &["subtotal", "sub total", "sub-total"];

/// Lines anchoring the tax amount.
pub const TAX_KEYWORDS: &[&str] = &["sales tax", "tax", "vat", "gst", "hst"];

/// Words that suggest a line names a merchant.
pub const MERCHANT_KEYWORDS: &[&str] = &[
    "market", "supermarket", "restaurant", "cafe", "coffee", "store", "shop", "grocery",
    "pharmacy", "supercenter", "bakery", "deli", "pizza", "bar", "grill", "station", "mart",
    "foods", "salon", "center",
];

/// Words that suggest a line is boilerplate rather than a merchant name.
pub const NON_MERCHANT_KEYWORDS: &[&str] = &[
    "receipt", "invoice", "subtotal", "total", "tax", "cashier", "register", "order", "welcome",
    "thank", "phone", "tel", "www", "http", "date", "time", "customer", "copy", "street", "ave",
];

/// Payment method vocabulary, in match-priority order. Specific phrases
/// first so "debit card" is not swallowed by "card".
pub const PAYMENT_KEYWORDS: &[(&str, PaymentKind)] = &[
    ("debit card", PaymentKind::Debit),
    ("debit", PaymentKind::Debit),
    ("credit card", PaymentKind::Credit),
    ("credit", PaymentKind::Credit),
    ("visa", PaymentKind::Credit),
    ("mastercard", PaymentKind::Credit),
    ("amex", PaymentKind::Credit),
    ("american express", PaymentKind::Credit),
    ("discover", PaymentKind::Credit),
    ("bank transfer", PaymentKind::Transfer),
    ("wire transfer", PaymentKind::Transfer),
    ("transfer", PaymentKind::Transfer),
    ("apple pay", PaymentKind::Wallet),
    ("google pay", PaymentKind::Wallet),
    ("paypal", PaymentKind::Wallet),
    ("venmo", PaymentKind::Wallet),
    ("wallet", PaymentKind::Wallet),
    ("cash", PaymentKind::Cash),
    ("card", PaymentKind::Credit),
];

/// Payment vocabulary tags, mapped to the model enum in `tender.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    Cash,
    Credit,
    Debit,
    Transfer,
    Wallet,
}

/// Currency symbols mapped to ISO codes. Multi-character symbols first.
pub const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("zł", "PLN"),
    ("kr", "SEK"),
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
    ("₩", "KRW"),
];

/// ISO codes recognized as bare words.
pub const CURRENCY_CODES: &[&str] = &[
    "usd", "eur", "gbp", "jpy", "pln", "inr", "krw", "cad", "aud", "chf", "sek",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_pattern() {
        assert!(AMOUNT.is_match("4.99"));
        assert!(AMOUNT.is_match("1,234.56"));
        assert!(AMOUNT.is_match("8,62"));
        assert!(!AMOUNT.is_match("12/15"));
        assert!(!AMOUNT.is_match("no numbers"));
    }

    #[test]
    fn test_date_patterns() {
        assert!(DATE_NUMERIC.is_match("12/15/2023"));
        assert!(DATE_NUMERIC.is_match("15.12.23"));
        assert!(DATE_ISO.is_match("2023-12-15"));
        assert!(DATE_TEXTUAL.is_match("December 15, 2023"));
        assert!(DATE_TEXTUAL.is_match("Dec 15 2023"));
    }

    #[test]
    fn test_time_patterns() {
        assert!(TIME_12H.is_match("3:45 PM"));
        assert!(TIME_12H.is_match("11:05am"));
        assert!(TIME_24H.is_match("15:45"));
        assert!(TIME_24H.is_match("09:30:12"));
    }

    #[test]
    fn test_receipt_number_pattern() {
        let caps = RECEIPT_NUMBER.captures("Receipt #: 00123-A").unwrap();
        assert_eq!(&caps[1], "00123-A");
        let caps = RECEIPT_NUMBER.captures("TRANS ID: 998877").unwrap();
        assert_eq!(&caps[1], "998877");
    }

    #[test]
    fn test_quantity_patterns() {
        assert!(QUANTITY_PREFIX.is_match("2x Milk"));
        assert!(QUANTITY_SUFFIX.is_match("Milk x3"));
        assert!(QUANTITY_LABEL.is_match("Milk qty 5"));
    }
}
