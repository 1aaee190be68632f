//! Payment method, receipt number, and currency extraction.

use super::patterns::{
    PaymentKind, CURRENCY_CODES, CURRENCY_SYMBOLS, PAYMENT_KEYWORDS, RECEIPT_NUMBER,
};
use super::ExtractionMatch;
use crate::models::receipt::PaymentMethod;
use crate::text::NormalizedText;

/// Look up the payment method against the fixed vocabulary. The first
/// matching phrase wins, so specific phrases are listed first.
pub fn extract_payment_method(text: &NormalizedText) -> Option<ExtractionMatch<PaymentMethod>> {
    for (keyword, kind) in PAYMENT_KEYWORDS {
        if let Some(pos) = text.lower.find(keyword) {
            let method = match kind {
                PaymentKind::Cash => PaymentMethod::Cash,
                PaymentKind::Credit => PaymentMethod::CreditCard,
                PaymentKind::Debit => PaymentMethod::DebitCard,
                PaymentKind::Transfer => PaymentMethod::BankTransfer,
                PaymentKind::Wallet => PaymentMethod::DigitalWallet,
            };
            return Some(
                ExtractionMatch::new(method, 0.8, *keyword)
                    .with_position(pos, pos + keyword.len()),
            );
        }
    }
    None
}

/// Keyword-anchored receipt/transaction number.
pub fn extract_receipt_number(text: &NormalizedText) -> Option<ExtractionMatch<String>> {
    for line in &text.lines {
        if let Some(caps) = RECEIPT_NUMBER.captures(line) {
            let m = caps.get(1).unwrap();
            return Some(
                ExtractionMatch::new(m.as_str().to_string(), 0.8, line.clone())
                    .with_position(m.start(), m.end()),
            );
        }
    }
    None
}

/// Detect the currency from symbols, then from bare ISO codes.
pub fn extract_currency(text: &NormalizedText) -> Option<ExtractionMatch<String>> {
    // Symbols are matched on the original lines since ISO detection below
    // works on the lowercase view.
    for line in &text.lines {
        for (symbol, code) in CURRENCY_SYMBOLS {
            if line.contains(symbol) {
                return Some(ExtractionMatch::new(code.to_string(), 0.9, *symbol));
            }
        }
    }

    for code in CURRENCY_CODES {
        if text
            .lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| word == *code)
        {
            return Some(ExtractionMatch::new(code.to_uppercase(), 0.8, *code));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_vocabulary() {
        let cases = [
            ("Paid with CASH", PaymentMethod::Cash),
            ("VISA ****1234", PaymentMethod::CreditCard),
            ("DEBIT CARD", PaymentMethod::DebitCard),
            ("Bank transfer ref 17", PaymentMethod::BankTransfer),
            ("Apple Pay", PaymentMethod::DigitalWallet),
        ];
        for (input, expected) in cases {
            let text = NormalizedText::new(input);
            let result = extract_payment_method(&text).unwrap();
            assert_eq!(result.value, expected, "{input}");
        }
    }

    #[test]
    fn test_debit_not_swallowed_by_card() {
        let text = NormalizedText::new("Payment: debit card ending 4821");
        assert_eq!(
            extract_payment_method(&text).unwrap().value,
            PaymentMethod::DebitCard
        );
    }

    #[test]
    fn test_no_payment_method() {
        let text = NormalizedText::new("WALMART\nTotal 8.62");
        assert!(extract_payment_method(&text).is_none());
    }

    #[test]
    fn test_receipt_number() {
        let text = NormalizedText::new("WALMART\nReceipt #: 00123-A\nTotal 8.62");
        let result = extract_receipt_number(&text).unwrap();
        assert_eq!(result.value, "00123-A");
    }

    #[test]
    fn test_receipt_number_requires_anchor() {
        let text = NormalizedText::new("WALMART\n00123-A");
        assert!(extract_receipt_number(&text).is_none());
    }

    #[test]
    fn test_currency_from_symbol() {
        let text = NormalizedText::new("Total $8.62");
        assert_eq!(extract_currency(&text).unwrap().value, "USD");

        let text = NormalizedText::new("Gesamt 8,62 €");
        assert_eq!(extract_currency(&text).unwrap().value, "EUR");
    }

    #[test]
    fn test_currency_from_iso_code() {
        let text = NormalizedText::new("Total 8.62 USD");
        let result = extract_currency(&text).unwrap();
        assert_eq!(result.value, "USD");
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_no_currency() {
        let text = NormalizedText::new("Total 8.62");
        assert!(extract_currency(&text).is_none());
    }
}
