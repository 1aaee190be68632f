//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::sync::Arc;

use async_trait::async_trait;

use rcpt_core::classify::HttpRemoteClassifier;
use rcpt_core::{
    CategoryClassifier, OcrEngine, OcrError, OcrOutput, RcptConfig, ReceiptParser,
    ThresholdPreset, WorkflowOptions, WorkflowOrchestrator,
};

/// Recognition source for the CLI: the external OCR engine has already run,
/// so "recognition" is reading its text dump from disk.
pub struct RecognizedTextFile;

#[async_trait]
impl OcrEngine for RecognizedTextFile {
    async fn recognize(&self, image_path: &str) -> Result<OcrOutput, OcrError> {
        let text = tokio::fs::read_to_string(image_path)
            .await
            .map_err(|e| OcrError::ImageRead(format!("{}: {}", image_path, e)))?;
        Ok(OcrOutput {
            text,
            confidence: None,
        })
    }
}

/// Load the config file when given, defaults otherwise.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RcptConfig> {
    match config_path {
        Some(path) => Ok(RcptConfig::from_file(std::path::Path::new(path))?),
        None => Ok(RcptConfig::default()),
    }
}

/// Build the pipeline from config plus command-line overrides.
pub fn build_orchestrator(config: &RcptConfig, remote_url: Option<&str>) -> WorkflowOrchestrator {
    let mut classifier = CategoryClassifier::new().with_remote_timeout(
        std::time::Duration::from_millis(config.classification.remote_timeout_ms),
    );

    let url = remote_url.or(config.classification.remote_url.as_deref());
    if let Some(url) = url {
        classifier = classifier.with_remote(Arc::new(HttpRemoteClassifier::new(url)));
    }

    WorkflowOrchestrator::new(
        Arc::new(RecognizedTextFile),
        ReceiptParser::with_config(config.extraction.clone()),
        classifier,
    )
}

/// Resolve workflow options from config plus command-line overrides.
pub fn build_options(
    config: &RcptConfig,
    preset: Option<&str>,
    no_classify: bool,
) -> anyhow::Result<WorkflowOptions> {
    let preset = match preset {
        Some(name) => ThresholdPreset::parse(name)
            .ok_or_else(|| anyhow::anyhow!("unknown threshold preset: {}", name))?,
        None => config.classification.preset,
    };

    Ok(WorkflowOptions {
        thresholds: preset.thresholds(),
        use_classifier: !no_classify && config.workflow.use_classifier,
    })
}
