//! Receipt data models produced by the parsing pipeline.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A structured receipt extracted from recognized text.
///
/// Constructed once per parse call and immutable thereafter. Every field the
/// extractors could not resolve is simply absent; absence is a normal
/// outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// Merchant name, usually from the top of the receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,

    /// Grand total charged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,

    /// Pre-tax subtotal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    /// Tax amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    /// Purchase date. Never in the future relative to parse time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Purchase time of day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,

    /// Payment method, when stated on the receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    /// Receipt/transaction number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,

    /// ISO currency code detected from symbols or codes in the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Line items in receipt order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ReceiptItem>,

    /// Overall extraction confidence (0.0 - 1.0).
    pub confidence: f32,

    /// The original recognized text.
    pub raw_text: String,

    /// Parsing metadata.
    pub metadata: ParsingMetadata,
}

impl ParsedReceipt {
    /// Whether the receipt carries enough signal for unattended use by a
    /// caller: confidence above 0.3 and at least one of total or merchant.
    pub fn is_valid(&self) -> bool {
        self.confidence > 0.3 && (self.total_amount.is_some() || self.merchant_name.is_some())
    }
}

/// A single line item on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item name as printed.
    pub name: String,

    /// Unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    /// Quantity; 1 when the line carries no quantity marker.
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Line total as printed, when distinguishable from the unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

fn default_quantity() -> u32 {
    1
}

impl ReceiptItem {
    /// The line total: the printed one if present, else price times quantity.
    pub fn line_total(&self) -> Option<Decimal> {
        self.total
            .or_else(|| self.price.map(|p| p * Decimal::from(self.quantity)))
    }
}

/// Payment method vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
    DigitalWallet,
    /// Anything outside the fixed vocabulary, with the matched text.
    Other(String),
}

impl PaymentMethod {
    /// Format for display.
    pub fn display(&self) -> String {
        match self {
            PaymentMethod::Cash => "cash".to_string(),
            PaymentMethod::CreditCard => "credit card".to_string(),
            PaymentMethod::DebitCard => "debit card".to_string(),
            PaymentMethod::BankTransfer => "bank transfer".to_string(),
            PaymentMethod::DigitalWallet => "digital wallet".to_string(),
            PaymentMethod::Other(s) => s.clone(),
        }
    }
}

/// Metadata about a parse run. Purely descriptive; never drives control flow
/// outside diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingMetadata {
    /// When the parse ran.
    pub parsed_at: DateTime<Utc>,

    /// Which extraction strategies resolved their field.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub strategies_used: BTreeSet<String>,

    /// Field-level confidence scores.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_confidence: HashMap<String, f32>,

    /// Cross-field validation warnings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Errors encountered while parsing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    /// Wall-clock parse duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Default for ParsingMetadata {
    fn default() -> Self {
        Self {
            parsed_at: Utc::now(),
            strategies_used: BTreeSet::new(),
            field_confidence: HashMap::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            duration_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_derived_from_price_and_quantity() {
        let item = ReceiptItem {
            name: "Milk".to_string(),
            price: Some(Decimal::new(499, 2)),
            quantity: 2,
            total: None,
        };
        assert_eq!(item.line_total(), Some(Decimal::new(998, 2)));
    }

    #[test]
    fn test_line_total_prefers_printed_total() {
        let item = ReceiptItem {
            name: "Bread".to_string(),
            price: Some(Decimal::new(299, 2)),
            quantity: 3,
            total: Some(Decimal::new(800, 2)),
        };
        assert_eq!(item.line_total(), Some(Decimal::new(800, 2)));
    }

    #[test]
    fn test_is_valid_requires_signal() {
        let mut receipt = ParsedReceipt {
            merchant_name: None,
            total_amount: None,
            subtotal: None,
            tax: None,
            date: None,
            time: None,
            payment_method: None,
            receipt_number: None,
            currency: None,
            items: Vec::new(),
            confidence: 0.9,
            raw_text: String::new(),
            metadata: ParsingMetadata::default(),
        };
        assert!(!receipt.is_valid());

        receipt.merchant_name = Some("WALMART".to_string());
        assert!(receipt.is_valid());

        receipt.confidence = 0.2;
        assert!(!receipt.is_valid());
    }
}
