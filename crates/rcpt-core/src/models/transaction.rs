//! Flat transaction record handed to persistence collaborators.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The external transaction record a successful workflow result converts
/// into. Built only from successful results; see
/// [`WorkflowResult::into_transaction`](crate::workflow::WorkflowResult::into_transaction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount charged.
    pub amount: Decimal,

    /// Spending category display name.
    pub category: String,

    /// Purchase date; falls back to the parse date when the receipt carried
    /// none.
    pub date: NaiveDate,

    /// Merchant name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,

    /// Free-text notes (receipt number, item summary).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Payment method display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    /// Back-reference to the source image.
    pub image_path: String,
}
