//! Receipt parser: runs every field strategy and assembles the result.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::receipt::{ParsedReceipt, ParsingMetadata};
use crate::text::NormalizedText;

use super::rules::{
    dates::DateExtractor, extract_amounts, extract_items, extract_merchant,
    extract_payment_method, extract_receipt_number, extract_time, FieldStrategy,
};
use super::scoring::{self, FieldConfidences};

/// Rule-based receipt parser.
///
/// `parse` is total: it never fails and never panics. Empty or unusable
/// input yields a zero-confidence receipt the caller can route to manual
/// entry.
pub struct ReceiptParser {
    config: ExtractionConfig,
}

impl ReceiptParser {
    /// Create a parser with default extraction settings.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// Create a parser with explicit extraction settings.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Parse recognized text into a structured receipt.
    pub fn parse(&self, raw_text: &str) -> ParsedReceipt {
        let start = Instant::now();
        let text = NormalizedText::new(raw_text);

        info!("parsing {} recognized lines", text.len());

        let mut strategies_used = BTreeSet::new();
        let mut field_confidence = HashMap::new();
        let mut warnings = Vec::new();

        if text.is_empty() {
            warnings.push("no recognized text".to_string());
            return ParsedReceipt {
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
                confidence: 0.0,
                raw_text: raw_text.to_string(),
                metadata: ParsingMetadata {
                    parsed_at: Utc::now(),
                    strategies_used,
                    field_confidence,
                    warnings,
                    errors: Vec::new(),
                    duration_ms: Some(start.elapsed().as_millis() as u64),
                },
            };
        }

        // Each strategy runs independently; none assumes another resolved.
        let merchant = extract_merchant(&text, self.config.merchant_scan_lines);
        if let Some(m) = &merchant {
            strategies_used.insert("merchant:line-scoring".to_string());
            field_confidence.insert("merchant".to_string(), m.confidence);
        }

        let min_total =
            Decimal::try_from(self.config.min_plausible_total).unwrap_or(Decimal::ONE);
        let amounts = extract_amounts(&text, min_total);
        if let (Some(total), Some(strategy)) = (&amounts.total, amounts.total_strategy) {
            strategies_used.insert(strategy.as_str().to_string());
            field_confidence.insert("total".to_string(), total.confidence);
        }
        if let Some(subtotal) = &amounts.subtotal {
            strategies_used.insert("subtotal:keyword-line".to_string());
            field_confidence.insert("subtotal".to_string(), subtotal.confidence);
        }
        if let Some(tax) = &amounts.tax {
            strategies_used.insert("tax:keyword-line".to_string());
            field_confidence.insert("tax".to_string(), tax.confidence);
        }

        let today = Utc::now().date_naive();
        let date = DateExtractor::new(today).extract(&text);
        if let Some(d) = &date {
            strategies_used.insert("date:pattern".to_string());
            field_confidence.insert("date".to_string(), d.confidence);
        }

        let time = extract_time(&text);
        if let Some(t) = &time {
            strategies_used.insert("time:pattern".to_string());
            field_confidence.insert("time".to_string(), t.confidence);
        }

        let payment_method = extract_payment_method(&text);
        if let Some(p) = &payment_method {
            strategies_used.insert("payment:vocabulary".to_string());
            field_confidence.insert("payment_method".to_string(), p.confidence);
        }

        let receipt_number = extract_receipt_number(&text);
        if let Some(r) = &receipt_number {
            strategies_used.insert("receipt_number:keyword".to_string());
            field_confidence.insert("receipt_number".to_string(), r.confidence);
        }

        let currency = super::rules::extract_currency(&text);
        if let Some(c) = &currency {
            strategies_used.insert("currency:symbol-table".to_string());
            field_confidence.insert("currency".to_string(), c.confidence);
        }

        let item_matches = extract_items(&text);
        let items_confidence = if item_matches.is_empty() {
            None
        } else {
            let mean = item_matches.iter().map(|i| i.confidence).sum::<f32>()
                / item_matches.len() as f32;
            strategies_used.insert("items:line-scoring".to_string());
            field_confidence.insert("items".to_string(), mean);
            Some(mean)
        };

        let confidence = scoring::combine(&FieldConfidences {
            total: amounts.total.as_ref().map(|m| m.confidence),
            merchant: merchant.as_ref().map(|m| m.confidence),
            date: date.as_ref().map(|m| m.confidence),
            tax: amounts.tax.as_ref().map(|m| m.confidence),
            items: items_confidence,
        });

        let total_amount = amounts.total.map(|m| m.value);
        let tax = amounts.tax.map(|m| m.value);
        let subtotal = amounts.subtotal.map(|m| m.value);

        // Cross-field validation: violations are warnings, never aborts.
        if let (Some(tax_value), Some(total_value)) = (tax, total_amount) {
            if tax_value >= total_value {
                warnings.push(format!(
                    "tax ({}) is not below total ({})",
                    tax_value, total_value
                ));
            }
        }
        if let (Some(sub), Some(tax_value), Some(total_value)) = (subtotal, tax, total_amount) {
            if ((sub + tax_value) - total_value).abs() > Decimal::new(2, 2) {
                warnings.push(format!(
                    "subtotal ({}) plus tax ({}) differs from total ({})",
                    sub, tax_value, total_value
                ));
            }
        }
        if let Some(d) = date.as_ref().map(|m| m.value) {
            if d > today {
                warnings.push(format!("date {} is in the future", d));
            }
        }

        let receipt = ParsedReceipt {
            merchant_name: merchant.map(|m| m.value),
            total_amount,
            subtotal,
            tax,
            date: date.map(|m| m.value),
            time: time.map(|m| m.value),
            payment_method: payment_method.map(|m| m.value),
            receipt_number: receipt_number.map(|m| m.value),
            currency: currency.map(|m| m.value),
            items: item_matches.into_iter().map(|m| m.value).collect(),
            confidence,
            raw_text: raw_text.to_string(),
            metadata: ParsingMetadata {
                parsed_at: Utc::now(),
                strategies_used,
                field_confidence,
                warnings,
                errors: Vec::new(),
                duration_ms: Some(start.elapsed().as_millis() as u64),
            },
        };

        debug!(
            "parsed receipt: merchant={:?} total={:?} confidence={:.2}",
            receipt.merchant_name, receipt.total_amount, receipt.confidence
        );

        receipt
    }

    /// Parse many texts, preserving input order. Each input is handled
    /// independently; one unusable input never affects its neighbors.
    pub fn parse_batch<I, S>(&self, texts: I) -> Vec<ParsedReceipt>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts.into_iter().map(|t| self.parse(t.as_ref())).collect()
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}
