//! Merchant name extraction.

use super::patterns::{MERCHANT_KEYWORDS, MIXED_CASE_TOKEN, NON_MERCHANT_KEYWORDS};
use super::{score_rules, ExtractionMatch, ScoringRule};
use crate::text::NormalizedText;

/// Scoring context for one candidate line.
pub struct LineContext<'a> {
    pub line: &'a str,
    pub lower: &'a str,
}

/// Declarative merchant scoring rules. The positional bonus is added
/// separately since it depends on the line index, not the line content.
fn merchant_rules<'a>() -> [ScoringRule<LineContext<'a>>; 5] {
    [
        ScoringRule {
            name: "merchant-keyword",
            weight: 0.2,
            predicate: |c| MERCHANT_KEYWORDS.iter().any(|k| c.lower.contains(k)),
        },
        ScoringRule {
            name: "non-merchant-keyword",
            weight: -0.3,
            predicate: |c| NON_MERCHANT_KEYWORDS.iter().any(|k| c.lower.contains(k)),
        },
        ScoringRule {
            name: "mixed-case",
            weight: 0.1,
            predicate: |c| MIXED_CASE_TOKEN.is_match(c.line),
        },
        ScoringRule {
            name: "contains-digits",
            weight: -0.2,
            predicate: |c| c.line.chars().any(|ch| ch.is_ascii_digit()),
        },
        ScoringRule {
            name: "implausible-length",
            weight: -0.3,
            predicate: |c| c.line.chars().count() < 3 || c.line.chars().count() > 50,
        },
    ]
}

/// Score the first `scan_lines` lines and pick the best merchant candidate.
///
/// Lines closer to the top get a +0.1-per-line positional bonus; the highest
/// score above 0.5 wins, otherwise the merchant stays unresolved.
pub fn extract_merchant(
    text: &NormalizedText,
    scan_lines: usize,
) -> Option<ExtractionMatch<String>> {
    let rules = merchant_rules();
    let mut best: Option<(f32, usize)> = None;

    for idx in 0..text.len().min(scan_lines) {
        let ctx = LineContext {
            line: &text.lines[idx],
            lower: &text.lower_lines[idx],
        };

        let position_bonus = 0.1 * (scan_lines - idx) as f32;
        let score = score_rules(&rules, &ctx) + position_bonus;

        match best {
            Some((s, _)) if s >= score => {}
            _ => best = Some((score, idx)),
        }
    }

    best.filter(|&(score, _)| score > 0.5).map(|(score, idx)| {
        ExtractionMatch::new(
            text.lines[idx].clone(),
            score.min(1.0),
            text.lines[idx].clone(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_merchant_top_line() {
        let text = NormalizedText::new(
            "WALMART SUPERCENTER\nDate: 12/15/2023\nMilk 4.99\nBread 2.99\nTotal 8.62",
        );
        let result = extract_merchant(&text, 5).unwrap();
        assert_eq!(result.value, "WALMART SUPERCENTER");
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_boilerplate_lines_rejected() {
        let text = NormalizedText::new("RECEIPT\nInvoice #12345\nSubtotal 7.98");
        assert!(extract_merchant(&text, 5).is_none());
    }

    #[test]
    fn test_mixed_case_brand_preferred_over_numeric_line() {
        let text = NormalizedText::new("Corner Bakery\n555-0100\nOrder 17");
        let result = extract_merchant(&text, 5).unwrap();
        assert_eq!(result.value, "Corner Bakery");
    }

    #[test]
    fn test_empty_text_unresolved() {
        let text = NormalizedText::new("");
        assert!(extract_merchant(&text, 5).is_none());
    }

    #[test]
    fn test_short_lines_penalized() {
        // Positional bonus alone must not push a two-character line over the
        // acceptance threshold.
        let text = NormalizedText::new("OK\nhm");
        assert!(extract_merchant(&text, 5).is_none());
    }
}
