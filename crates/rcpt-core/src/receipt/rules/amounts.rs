//! Amount extraction: total, subtotal, and tax.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::{AMOUNT, DATE_NUMERIC, SUBTOTAL_KEYWORDS, TAX_KEYWORDS, TOTAL_KEYWORDS};
use super::ExtractionMatch;
use crate::text::NormalizedText;

/// Strategy tag recorded in parsing metadata for the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalStrategy {
    /// A keyword-anchored line yielded the value.
    KeywordLine,
    /// Positional scan over the bottom half of the receipt.
    Positional,
    /// Largest amount anywhere in the text.
    LargestAmount,
}

impl TotalStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TotalStrategy::KeywordLine => "total:keyword-line",
            TotalStrategy::Positional => "total:positional",
            TotalStrategy::LargestAmount => "total:largest-amount",
        }
    }
}

/// Extracted amount fields.
#[derive(Debug, Clone, Default)]
pub struct AmountFields {
    pub total: Option<ExtractionMatch<Decimal>>,
    pub subtotal: Option<ExtractionMatch<Decimal>>,
    pub tax: Option<ExtractionMatch<Decimal>>,
    /// Which strategy produced the total, when one did.
    pub total_strategy: Option<TotalStrategy>,
}

/// Extract total, subtotal, and tax amounts.
///
/// Total resolution order: keyword-anchored line (confidence 0.9), then a
/// positional scan of the bottom half (0.5 plus a position bonus), then the
/// single largest amount anywhere (0.4). Subtotal and tax are keyword-only;
/// when unmatched they stay absent, never zero.
pub fn extract_amounts(text: &NormalizedText, min_plausible_total: Decimal) -> AmountFields {
    let mut fields = AmountFields::default();

    fields.subtotal = keyword_anchored(text, SUBTOTAL_KEYWORDS, &[]);
    fields.tax = keyword_anchored(text, TAX_KEYWORDS, SUBTOTAL_KEYWORDS);

    // Total keyword lines must not be subtotal lines ("subtotal" contains
    // "total").
    if let Some(total) = keyword_anchored(text, TOTAL_KEYWORDS, SUBTOTAL_KEYWORDS) {
        fields.total = Some(total);
        fields.total_strategy = Some(TotalStrategy::KeywordLine);
        return fields;
    }

    if let Some(total) = positional_total(text, min_plausible_total) {
        fields.total = Some(total);
        fields.total_strategy = Some(TotalStrategy::Positional);
        return fields;
    }

    if let Some(total) = largest_amount(text) {
        fields.total = Some(total);
        fields.total_strategy = Some(TotalStrategy::LargestAmount);
    }

    fields
}

/// Last amount on the last line that contains one of `keywords` but none of
/// `exclude`.
fn keyword_anchored(
    text: &NormalizedText,
    keywords: &[&str],
    exclude: &[&str],
) -> Option<ExtractionMatch<Decimal>> {
    let mut best: Option<ExtractionMatch<Decimal>> = None;

    for idx in text.lines_containing(keywords) {
        if exclude.iter().any(|k| text.lower_lines[idx].contains(k)) {
            continue;
        }
        if let Some(amount) = amounts_in_line(&text.lines[idx]).into_iter().last() {
            // Later lines win; receipts print the grand total near the bottom.
            best = Some(ExtractionMatch::new(amount, 0.9, text.lines[idx].clone()));
        }
    }

    best
}

/// Scan the bottom half for plausible amounts, scoring later lines higher.
fn positional_total(
    text: &NormalizedText,
    min_plausible: Decimal,
) -> Option<ExtractionMatch<Decimal>> {
    let len = text.len();
    if len == 0 {
        return None;
    }

    let mut best: Option<(f32, Decimal, usize)> = None;
    for idx in len / 2..len {
        for amount in amounts_in_line(&text.lines[idx]) {
            if amount < min_plausible {
                continue;
            }
            let position = if len > 1 {
                idx as f32 / (len - 1) as f32
            } else {
                1.0
            };
            let confidence = 0.5 + 0.4 * position;
            match best {
                Some((c, _, _)) if c >= confidence => {}
                _ => best = Some((confidence, amount, idx)),
            }
        }
    }

    best.map(|(confidence, amount, idx)| {
        ExtractionMatch::new(amount, confidence, text.lines[idx].clone())
    })
}

/// The single largest amount anywhere in the text.
fn largest_amount(text: &NormalizedText) -> Option<ExtractionMatch<Decimal>> {
    text.lines
        .iter()
        .flat_map(|line| {
            amounts_in_line(line)
                .into_iter()
                .map(move |a| (a, line.clone()))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(amount, line)| ExtractionMatch::new(amount, 0.4, line))
}

/// All parsable amounts on a line, in order, skipping tokens that are part
/// of a numeric date (e.g. the "12.23" inside "15.12.23").
pub fn amounts_in_line(line: &str) -> Vec<Decimal> {
    let date_spans: Vec<(usize, usize)> = DATE_NUMERIC
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .collect();

    AMOUNT
        .find_iter(line)
        .filter(|m| {
            !date_spans
                .iter()
                .any(|&(s, e)| m.start() < e && m.end() > s)
        })
        .filter_map(|m| parse_amount(m.as_str()))
        .collect()
}

/// Parse an amount string with thousands separators and either decimal
/// separator ("1,234.56", "1 234,56", "4.99").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else if cleaned.contains(',') && cleaned.contains('.') {
        // Whichever separator comes last is the decimal point.
        let comma_pos = cleaned.rfind(',');
        let dot_pos = cleaned.rfind('.');
        match (comma_pos, dot_pos) {
            (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => cleaned.replace(',', ""),
            _ => cleaned,
        }
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn min_total() -> Decimal {
        Decimal::ONE
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("4.99"), Some(dec("4.99")));
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("8,62"), Some(dec("8.62")));
        assert_eq!(parse_amount("1.234,56"), Some(dec("1234.56")));
    }

    #[test]
    fn test_keyword_anchored_total() {
        let text = NormalizedText::new("Milk 4.99\nSubtotal 7.98\nTax 0.64\nTotal 8.62");
        let fields = extract_amounts(&text, min_total());

        assert_eq!(fields.total.as_ref().unwrap().value, dec("8.62"));
        assert_eq!(fields.total.as_ref().unwrap().confidence, 0.9);
        assert_eq!(fields.total_strategy, Some(TotalStrategy::KeywordLine));
        assert_eq!(fields.subtotal.unwrap().value, dec("7.98"));
        assert_eq!(fields.tax.unwrap().value, dec("0.64"));
    }

    #[test]
    fn test_subtotal_line_does_not_feed_total() {
        let text = NormalizedText::new("Subtotal 7.98");
        let fields = extract_amounts(&text, min_total());

        assert_eq!(fields.subtotal.as_ref().unwrap().value, dec("7.98"));
        // With no total keyword line, the fallback chain picks up 7.98 but
        // not via the keyword strategy.
        assert_ne!(fields.total_strategy, Some(TotalStrategy::KeywordLine));
    }

    #[test]
    fn test_amount_due_keyword() {
        let text = NormalizedText::new("Amount Due: 42.00");
        let fields = extract_amounts(&text, min_total());
        assert_eq!(fields.total.unwrap().value, dec("42.00"));
    }

    #[test]
    fn test_positional_fallback_prefers_later_lines() {
        let text = NormalizedText::new("Store\nItem 3.00\nItem 4.00\n12.50\n5.00");
        let fields = extract_amounts(&text, min_total());

        // Bottom-half scan; the last line scores highest.
        assert_eq!(fields.total_strategy, Some(TotalStrategy::Positional));
        assert_eq!(fields.total.unwrap().value, dec("5.00"));
    }

    #[test]
    fn test_largest_amount_fallback() {
        // Amounts below the plausibility floor in the bottom half force the
        // final fallback.
        let text = NormalizedText::new("Candy 0.75\nGum 0.50\nMint 0.25\nStamp 0.10");
        let fields = extract_amounts(&text, min_total());

        assert_eq!(fields.total_strategy, Some(TotalStrategy::LargestAmount));
        assert_eq!(fields.total.as_ref().unwrap().value, dec("0.75"));
        assert_eq!(fields.total.unwrap().confidence, 0.4);
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let text = NormalizedText::new("WALMART\nThank you");
        let fields = extract_amounts(&text, min_total());

        assert!(fields.total.is_none());
        assert!(fields.subtotal.is_none());
        assert!(fields.tax.is_none());
    }

    #[test]
    fn test_dotted_date_not_mistaken_for_amount() {
        assert!(amounts_in_line("Date: 15.12.23").is_empty());
        assert_eq!(amounts_in_line("15.12.23 Total 8.62"), vec![dec("8.62")]);
    }

    #[test]
    fn test_tax_keyword_variants() {
        for line in ["Tax 0.64", "VAT: 0.64", "GST 0.64", "Sales Tax 0.64"] {
            let text = NormalizedText::new(line);
            let fields = extract_amounts(&text, min_total());
            assert_eq!(fields.tax.as_ref().unwrap().value, dec("0.64"), "{line}");
        }
    }
}
