//! Data models for parsed receipts, classification results, and configuration.

pub mod classification;
pub mod config;
pub mod receipt;
pub mod transaction;

pub use classification::{Category, ClassificationMethod, ClassificationResult};
pub use config::{ConfidenceThresholds, RcptConfig, ThresholdPreset};
pub use receipt::{ParsedReceipt, ParsingMetadata, PaymentMethod, ReceiptItem};
pub use transaction::Transaction;
