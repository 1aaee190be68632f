//! Error types for the rcpt-core library.

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// Text recognition error from the external OCR collaborator.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Category classification error.
    #[error("classification error: {0}")]
    Classify(#[from] ClassifyError),

    /// Workflow error.
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by the external text recognition engine.
///
/// The engine itself is out of scope; these variants only describe the
/// boundary contract.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The source image could not be read.
    #[error("failed to read image: {0}")]
    ImageRead(String),

    /// The engine ran but produced no usable output.
    #[error("recognition produced no text")]
    NoText,

    /// The engine failed outright.
    #[error("recognition failed: {0}")]
    Engine(String),
}

/// Errors related to remote category classification.
///
/// All of these are recovered locally by falling back to the rule-based
/// prediction; they never escape the classifier.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// HTTP transport failure.
    #[error("remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote call exceeded its deadline.
    #[error("remote call timed out after {0}ms")]
    Timeout(u64),

    /// The remote replied with something that does not parse.
    #[error("malformed remote response: {0}")]
    MalformedResponse(String),
}

/// Errors related to workflow results and their conversion.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A pipeline stage failed; captured into the result, never propagated.
    #[error("{stage} stage failed: {reason}")]
    StageFailed { stage: String, reason: String },

    /// Conversion was attempted on an unsuccessful result.
    #[error("cannot build a transaction from a failed workflow result")]
    NotSuccessful,

    /// Conversion was attempted without a parsed receipt.
    #[error("workflow result has no parsed receipt")]
    MissingReceipt,

    /// Conversion requires a field the parser did not recover.
    #[error("parsed receipt is missing required field: {0}")]
    MissingField(String),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
