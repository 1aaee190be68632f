//! Rule-based field extraction strategies for receipt text.
//!
//! Each field has one independent strategy; strategies never fail and never
//! depend on each other's output. A field that cannot be resolved is absent,
//! which downstream code treats as a normal outcome.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod merchant;
pub mod patterns;
pub mod tender;

pub use amounts::{extract_amounts, parse_amount, AmountFields};
pub use dates::{extract_date, extract_time, DateExtractor};
pub use items::extract_items;
pub use merchant::extract_merchant;
pub use tender::{extract_currency, extract_payment_method, extract_receipt_number};

use crate::text::NormalizedText;

/// Trait for per-field extraction strategies.
pub trait FieldStrategy {
    /// The type of value this strategy produces.
    type Output;

    /// Extract the field, or report absence.
    fn extract(&self, text: &NormalizedText) -> Option<ExtractionMatch<Self::Output>>;
}

/// An extracted value with its confidence and provenance.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// One declarative scoring rule: a named predicate and the weight it adds
/// when the predicate holds.
pub struct ScoringRule<C> {
    pub name: &'static str,
    pub weight: f32,
    pub predicate: fn(&C) -> bool,
}

/// Evaluate a rule table uniformly over a context.
pub fn score_rules<C>(rules: &[ScoringRule<C>], ctx: &C) -> f32 {
    rules
        .iter()
        .filter(|rule| (rule.predicate)(ctx))
        .map(|rule| rule.weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        len: usize,
    }

    const RULES: &[ScoringRule<Ctx>] = &[
        ScoringRule {
            name: "short",
            weight: 0.3,
            predicate: |c| c.len < 10,
        },
        ScoringRule {
            name: "nonempty",
            weight: 0.2,
            predicate: |c| c.len > 0,
        },
    ];

    #[test]
    fn test_score_rules_sums_matching_weights() {
        assert!((score_rules(RULES, &Ctx { len: 5 }) - 0.5).abs() < 1e-6);
        assert!((score_rules(RULES, &Ctx { len: 50 }) - 0.2).abs() < 1e-6);
        assert!((score_rules(RULES, &Ctx { len: 0 }) - 0.3).abs() < 1e-6);
    }
}
