//! Top-level pipeline state machine.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::classify::{CategoryClassifier, ClassificationRequest};
use crate::error::WorkflowError;
use crate::models::config::ConfidenceThresholds;
use crate::receipt::ReceiptParser;

use super::{OcrEngine, WorkflowResult, WorkflowStage};

/// Weights for combining parse and classification confidence.
const PARSE_WEIGHT: f32 = 0.6;
const CLASSIFY_WEIGHT: f32 = 0.4;

/// Per-call workflow options. Passed in explicitly; never global state.
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// Active confidence thresholds.
    pub thresholds: ConfidenceThresholds,
    /// Run the classify stage. When off, results carry no classification.
    pub use_classifier: bool,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            thresholds: ConfidenceThresholds::DEFAULT,
            use_classifier: true,
        }
    }
}

/// Progress callback invoked before each stage.
pub type ProgressFn<'a> = &'a (dyn Fn(WorkflowStage) + Send + Sync);

/// Sequences OCR → parse → classify → complete for one image at a time.
///
/// Stage failures never propagate: they are captured into an unsuccessful
/// `WorkflowResult` and the orchestrator never retries on its own.
pub struct WorkflowOrchestrator {
    ocr: Arc<dyn OcrEngine>,
    parser: ReceiptParser,
    classifier: CategoryClassifier,
}

impl WorkflowOrchestrator {
    pub fn new(ocr: Arc<dyn OcrEngine>, parser: ReceiptParser, classifier: CategoryClassifier) -> Self {
        Self {
            ocr,
            parser,
            classifier,
        }
    }

    /// Run the full pipeline over one image.
    pub async fn process(&self, image_path: &str, options: &WorkflowOptions) -> WorkflowResult {
        self.process_with_progress(image_path, options, None).await
    }

    /// Run the full pipeline, reporting each stage through `progress`.
    pub async fn process_with_progress(
        &self,
        image_path: &str,
        options: &WorkflowOptions,
        progress: Option<ProgressFn<'_>>,
    ) -> WorkflowResult {
        let start = Instant::now();
        let report = |stage: WorkflowStage| {
            if let Some(f) = progress {
                f(stage);
            }
        };

        info!("processing {}", image_path);
        report(WorkflowStage::Ocr);

        let ocr_output = match self.ocr.recognize(image_path).await {
            Ok(output) => output,
            Err(e) => {
                warn!("OCR failed for {}: {}", image_path, e);
                let error = WorkflowError::StageFailed {
                    stage: WorkflowStage::Ocr.to_string(),
                    reason: e.to_string(),
                };
                return Self::failed(image_path, error.to_string(), start);
            }
        };

        report(WorkflowStage::Parse);
        let receipt = self.parser.parse(&ocr_output.text);

        let classification = if options.use_classifier {
            report(WorkflowStage::Classify);
            let request = ClassificationRequest {
                merchant: receipt.merchant_name.clone(),
                description: item_summary(&receipt),
                amount: receipt.total_amount,
            };
            Some(self.classifier.classify(&request, &options.thresholds).await)
        } else {
            None
        };

        report(WorkflowStage::Complete);

        let overall_confidence = match &classification {
            Some(c) => PARSE_WEIGHT * receipt.confidence + CLASSIFY_WEIGHT * c.confidence,
            None => receipt.confidence,
        };
        let needs_review = overall_confidence < options.thresholds.minimum
            || receipt.total_amount.is_none()
            || receipt.merchant_name.is_none();

        debug!(
            "completed {} with overall confidence {:.2} (review: {})",
            image_path, overall_confidence, needs_review
        );

        WorkflowResult {
            success: true,
            image_path: image_path.to_string(),
            receipt: Some(receipt),
            classification,
            error_message: None,
            overall_confidence,
            needs_review,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Run the pipeline over many images sequentially, one result per image.
    /// A failed image never affects its neighbors.
    pub async fn process_batch(
        &self,
        image_paths: &[String],
        options: &WorkflowOptions,
    ) -> Vec<WorkflowResult> {
        let mut results = Vec::with_capacity(image_paths.len());
        for path in image_paths {
            results.push(self.process(path, options).await);
        }
        results
    }

    fn failed(image_path: &str, message: String, start: Instant) -> WorkflowResult {
        WorkflowResult {
            success: false,
            image_path: image_path.to_string(),
            receipt: None,
            classification: None,
            error_message: Some(message),
            overall_confidence: 0.0,
            needs_review: true,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Item names joined as a free-text description for the classifier.
fn item_summary(receipt: &crate::models::receipt::ParsedReceipt) -> Option<String> {
    if receipt.items.is_empty() {
        return None;
    }
    Some(
        receipt
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OcrError, WorkflowError};
    use crate::models::classification::ClassificationMethod;
    use crate::workflow::OcrOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const WALMART: &str = "WALMART SUPERCENTER\nDate: 12/15/2023\nMilk 4.99\nBread 2.99\nSubtotal 7.98\nTax 0.64\nTotal 8.62";

    /// Recognizer returning scripted text per image path.
    struct FakeOcr;

    #[async_trait]
    impl OcrEngine for FakeOcr {
        async fn recognize(&self, image_path: &str) -> Result<OcrOutput, OcrError> {
            match image_path {
                "walmart.jpg" => Ok(OcrOutput {
                    text: WALMART.to_string(),
                    confidence: Some(0.92),
                }),
                "blank.jpg" => Ok(OcrOutput {
                    text: String::new(),
                    confidence: None,
                }),
                _ => Err(OcrError::ImageRead(format!("no such image: {image_path}"))),
            }
        }
    }

    fn orchestrator() -> WorkflowOrchestrator {
        WorkflowOrchestrator::new(
            Arc::new(FakeOcr),
            ReceiptParser::new(),
            CategoryClassifier::new(),
        )
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let result = orchestrator()
            .process("walmart.jpg", &WorkflowOptions::default())
            .await;

        assert!(result.success);
        let receipt = result.receipt.as_ref().unwrap();
        assert_eq!(receipt.merchant_name.as_deref(), Some("WALMART SUPERCENTER"));

        let classification = result.classification.as_ref().unwrap();
        assert_eq!(classification.category.as_str(), "Groceries");
        assert_eq!(classification.method, ClassificationMethod::RuleBased);
        assert!(!result.needs_review);
    }

    #[tokio::test]
    async fn test_classifier_can_be_skipped() {
        let options = WorkflowOptions {
            use_classifier: false,
            ..Default::default()
        };
        let result = orchestrator().process("walmart.jpg", &options).await;

        assert!(result.success);
        assert!(result.classification.is_none());
        // Parse confidence alone drives the overall score.
        assert_eq!(
            result.overall_confidence,
            result.receipt.as_ref().unwrap().confidence
        );
    }

    #[tokio::test]
    async fn test_ocr_failure_is_captured_not_propagated() {
        let result = orchestrator()
            .process("missing.jpg", &WorkflowOptions::default())
            .await;

        assert!(!result.success);
        assert!(result.receipt.is_none());
        assert!(result.error_message.as_ref().unwrap().contains("ocr stage"));
        assert!(result.needs_review);
    }

    #[tokio::test]
    async fn test_empty_recognition_yields_low_confidence_result() {
        let result = orchestrator()
            .process("blank.jpg", &WorkflowOptions::default())
            .await;

        assert!(result.success);
        assert_eq!(result.receipt.as_ref().unwrap().confidence, 0.0);
        assert!(result.needs_review);
    }

    #[tokio::test]
    async fn test_progress_reports_every_stage() {
        let stages: Mutex<Vec<WorkflowStage>> = Mutex::new(Vec::new());
        let record = |stage: WorkflowStage| {
            stages.lock().unwrap().push(stage);
        };

        orchestrator()
            .process_with_progress("walmart.jpg", &WorkflowOptions::default(), Some(&record))
            .await;

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                WorkflowStage::Ocr,
                WorkflowStage::Parse,
                WorkflowStage::Classify,
                WorkflowStage::Complete,
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_isolates_failures_and_preserves_order() {
        let paths = vec![
            "walmart.jpg".to_string(),
            "missing.jpg".to_string(),
            "blank.jpg".to_string(),
        ];
        let results = orchestrator()
            .process_batch(&paths, &WorkflowOptions::default())
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[2].success);
        assert_eq!(results[1].image_path, "missing.jpg");
    }

    #[tokio::test]
    async fn test_transaction_conversion() {
        let result = orchestrator()
            .process("walmart.jpg", &WorkflowOptions::default())
            .await;
        let transaction = result.into_transaction().unwrap();

        assert_eq!(transaction.category, "Groceries");
        assert_eq!(transaction.merchant.as_deref(), Some("WALMART SUPERCENTER"));
        assert_eq!(transaction.image_path, "walmart.jpg");
        assert_eq!(
            transaction.date,
            chrono::NaiveDate::from_ymd_opt(2023, 12, 15).unwrap()
        );
    }

    #[tokio::test]
    async fn test_transaction_conversion_fails_loudly_on_failure() {
        let result = orchestrator()
            .process("missing.jpg", &WorkflowOptions::default())
            .await;

        assert!(matches!(
            result.into_transaction(),
            Err(WorkflowError::NotSuccessful)
        ));
    }

    #[tokio::test]
    async fn test_transaction_conversion_requires_total() {
        let result = orchestrator()
            .process("blank.jpg", &WorkflowOptions::default())
            .await;

        assert!(matches!(
            result.into_transaction(),
            Err(WorkflowError::MissingField(_))
        ));
    }
}
