//! Workflow orchestration: OCR → parse → classify → complete.

mod orchestrator;

pub use orchestrator::{ProgressFn, WorkflowOptions, WorkflowOrchestrator};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{OcrError, WorkflowError};
use crate::models::classification::ClassificationResult;
use crate::models::receipt::ParsedReceipt;
use crate::models::transaction::Transaction;

/// The external text recognition collaborator.
///
/// The engine itself is out of scope; this seam only fixes the contract: a
/// text string (possibly empty) and an optional overall confidence that the
/// pipeline does not currently consume.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image_path: &str) -> Result<OcrOutput, OcrError>;
}

/// Output of the recognition engine.
#[derive(Debug, Clone)]
pub struct OcrOutput {
    pub text: String,
    pub confidence: Option<f32>,
}

/// Pipeline stages, reported through the progress callback before each
/// stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Ocr,
    Parse,
    Classify,
    Complete,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Ocr => "ocr",
            WorkflowStage::Parse => "parse",
            WorkflowStage::Classify => "classify",
            WorkflowStage::Complete => "complete",
        }
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running the full pipeline over one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Whether every stage completed.
    pub success: bool,

    /// Opaque reference to the source image.
    pub image_path: String,

    /// Parsed receipt, present when the parse stage ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ParsedReceipt>,

    /// Classification, present when the classify stage ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationResult>,

    /// Failure description for unsuccessful results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Combined parse/classification confidence.
    pub overall_confidence: f32,

    /// Whether a human should confirm before the result is persisted.
    pub needs_review: bool,

    /// Wall-clock pipeline time.
    pub processing_time_ms: u64,
}

impl WorkflowResult {
    /// Convert a successful result into a flat transaction record.
    ///
    /// Fails loudly rather than defaulting: unsuccessful results, results
    /// without a receipt, and receipts without a total are all rejected.
    pub fn into_transaction(self) -> Result<Transaction, WorkflowError> {
        if !self.success {
            return Err(WorkflowError::NotSuccessful);
        }
        let receipt = self.receipt.ok_or(WorkflowError::MissingReceipt)?;
        let amount = receipt
            .total_amount
            .ok_or_else(|| WorkflowError::MissingField("total_amount".to_string()))?;

        let category = self
            .classification
            .as_ref()
            .map(|c| c.category.to_string())
            .unwrap_or_else(|| "Other".to_string());

        let notes = receipt
            .receipt_number
            .as_ref()
            .map(|n| format!("receipt #{}", n));

        Ok(Transaction {
            amount,
            category,
            date: receipt
                .date
                .unwrap_or_else(|| receipt.metadata.parsed_at.date_naive()),
            merchant: receipt.merchant_name.clone(),
            notes,
            payment_method: receipt.payment_method.as_ref().map(|p| p.display()),
            image_path: self.image_path,
        })
    }
}
