//! Line item extraction.

use super::amounts::amounts_in_line;
use super::patterns::{
    AMOUNT, QUANTITY_LABEL, QUANTITY_PREFIX, QUANTITY_SUFFIX, TAX_KEYWORDS, TOTAL_KEYWORDS,
};
use super::{score_rules, ExtractionMatch, ScoringRule};
use crate::models::receipt::ReceiptItem;
use crate::text::NormalizedText;

/// Base score for any line that carries a decimal price. Rule adjustments
/// move it above or below the 0.5 acceptance threshold.
const PRICE_LINE_BASE: f32 = 0.5;

/// Scoring context for one priced line.
pub struct ItemLineContext<'a> {
    pub line: &'a str,
    pub lower: &'a str,
}

fn item_rules<'a>() -> [ScoringRule<ItemLineContext<'a>>; 4] {
    [
        ScoringRule {
            name: "quantity-marker",
            weight: 0.3,
            predicate: |c| {
                QUANTITY_PREFIX.is_match(c.line)
                    || QUANTITY_SUFFIX.is_match(c.line)
                    || QUANTITY_LABEL.is_match(c.line)
            },
        },
        ScoringRule {
            name: "plausible-length",
            weight: 0.2,
            predicate: |c| (10..=80).contains(&c.line.chars().count()),
        },
        ScoringRule {
            name: "starts-alphabetic",
            weight: 0.2,
            predicate: |c| c.line.chars().next().is_some_and(|ch| ch.is_alphabetic()),
        },
        ScoringRule {
            name: "summary-keyword",
            weight: -0.5,
            predicate: |c| {
                TOTAL_KEYWORDS
                    .iter()
                    .chain(TAX_KEYWORDS.iter())
                    .any(|k| c.lower.contains(k))
            },
        },
    ]
}

/// Score every priced line and keep the ones scoring above 0.5.
pub fn extract_items(text: &NormalizedText) -> Vec<ExtractionMatch<ReceiptItem>> {
    let rules = item_rules();
    let mut items = Vec::new();

    for idx in 0..text.len() {
        let line = &text.lines[idx];
        let prices = amounts_in_line(line);
        if prices.is_empty() {
            continue;
        }

        let ctx = ItemLineContext {
            line,
            lower: &text.lower_lines[idx],
        };
        let score = PRICE_LINE_BASE + score_rules(&rules, &ctx);
        if score <= 0.5 {
            continue;
        }

        let quantity = quantity_marker(line).unwrap_or(1);
        let name = item_name(line);
        if name.is_empty() {
            continue;
        }

        // With two or more amounts the first is the unit price and the last
        // the printed line total; with one, the total is derived downstream.
        let (price, total) = if prices.len() >= 2 {
            (Some(prices[0]), prices.last().copied())
        } else {
            (Some(prices[0]), None)
        };

        items.push(ExtractionMatch::new(
            ReceiptItem {
                name,
                price,
                quantity,
                total,
            },
            score.min(1.0),
            line.clone(),
        ));
    }

    items
}

/// Explicit quantity from "2x", "x3", or "qty 5" markers.
fn quantity_marker(line: &str) -> Option<u32> {
    QUANTITY_PREFIX
        .captures(line)
        .or_else(|| QUANTITY_LABEL.captures(line))
        .or_else(|| QUANTITY_SUFFIX.captures(line))
        .and_then(|caps| caps[1].parse().ok())
}

/// The line with amounts and quantity markers stripped.
fn item_name(line: &str) -> String {
    let without_amounts = AMOUNT.replace_all(line, "");
    let without_qty = QUANTITY_PREFIX.replace(&without_amounts, "");
    let without_qty = QUANTITY_LABEL.replace_all(&without_qty, "");
    let without_qty = QUANTITY_SUFFIX.replace_all(&without_qty, "");

    without_qty
        .trim_matches(|c: char| c.is_whitespace() || "$€£¥₹:;-*.,@".contains(c))
        .to_string()
}
