//! Core library for receipt OCR post-processing.
//!
//! This crate provides:
//! - Text normalization over raw recognized receipt text
//! - Rule-based field extraction (merchant, amounts, dates, tender, items)
//! - Receipt-level confidence scoring
//! - Hybrid category classification (rules plus an optional remote model)
//! - Workflow orchestration with per-stage progress and batch processing

pub mod classify;
pub mod error;
pub mod models;
pub mod receipt;
pub mod text;
pub mod workflow;

pub use classify::{CategoryClassifier, ClassificationCache, ClassificationRequest};
pub use error::{ClassifyError, OcrError, RcptError, Result, WorkflowError};
pub use models::{
    Category, ClassificationMethod, ClassificationResult, ConfidenceThresholds, ParsedReceipt,
    RcptConfig, ReceiptItem, ThresholdPreset, Transaction,
};
pub use receipt::ReceiptParser;
pub use text::NormalizedText;
pub use workflow::{
    OcrEngine, OcrOutput, WorkflowOptions, WorkflowOrchestrator, WorkflowResult, WorkflowStage,
};
