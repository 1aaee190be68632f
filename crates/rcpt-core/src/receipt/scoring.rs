//! Receipt-level confidence aggregation.

/// Field weights. Missing fields contribute zero to their weighted term but
/// stay in the denominator, so a sparse receipt scores low even when its few
/// resolved fields are individually confident. The weights are configurable
/// defaults, not tuned optima.
pub const WEIGHT_TOTAL: f32 = 0.35;
pub const WEIGHT_MERCHANT: f32 = 0.30;
pub const WEIGHT_DATE: f32 = 0.15;
pub const WEIGHT_TAX: f32 = 0.10;
pub const WEIGHT_ITEMS: f32 = 0.10;

/// Per-field confidences feeding the receipt-level score. `None` means the
/// field was not resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldConfidences {
    pub total: Option<f32>,
    pub merchant: Option<f32>,
    pub date: Option<f32>,
    pub tax: Option<f32>,
    pub items: Option<f32>,
}

/// Combine per-field confidences into a single receipt confidence.
///
/// Pure and monotonic: raising any per-field confidence never lowers the
/// result.
pub fn combine(fields: &FieldConfidences) -> f32 {
    let term = |confidence: Option<f32>, weight: f32| confidence.unwrap_or(0.0) * weight;

    term(fields.total, WEIGHT_TOTAL)
        + term(fields.merchant, WEIGHT_MERCHANT)
        + term(fields.date, WEIGHT_DATE)
        + term(fields.tax, WEIGHT_TAX)
        + term(fields.items, WEIGHT_ITEMS)
}
