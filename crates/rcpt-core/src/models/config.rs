//! Configuration structures for the extraction and classification pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RcptError, Result};

/// Confidence thresholds steering the hybrid classification policy.
///
/// Invariant: `minimum <= remote_fallback <= auto_accept <= 1.0`. The preset
/// boundaries are configurable defaults, not tuned optima.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    /// Rule confidence at or above this is accepted without a remote call.
    pub auto_accept: f32,
    /// Minimum remote-reported confidence for a disagreeing remote
    /// prediction to override the rule prediction.
    pub remote_fallback: f32,
    /// Below this the rule result is returned as-is and the overall result
    /// is flagged for review.
    pub minimum: f32,
}

impl ConfidenceThresholds {
    pub const DEFAULT: Self = Self {
        auto_accept: 0.8,
        remote_fallback: 0.5,
        minimum: 0.3,
    };

    pub const STRICT: Self = Self {
        auto_accept: 0.9,
        remote_fallback: 0.7,
        minimum: 0.5,
    };

    pub const LENIENT: Self = Self {
        auto_accept: 0.7,
        remote_fallback: 0.4,
        minimum: 0.2,
    };

    /// Build custom thresholds, checking the ordering invariant.
    pub fn new(auto_accept: f32, remote_fallback: f32, minimum: f32) -> Result<Self> {
        let thresholds = Self {
            auto_accept,
            remote_fallback,
            minimum,
        };
        if !thresholds.is_ordered() {
            return Err(RcptError::Config(format!(
                "thresholds must satisfy minimum <= remote_fallback <= auto_accept <= 1.0, got {:.2}/{:.2}/{:.2}",
                minimum, remote_fallback, auto_accept
            )));
        }
        Ok(thresholds)
    }

    fn is_ordered(&self) -> bool {
        0.0 <= self.minimum
            && self.minimum <= self.remote_fallback
            && self.remote_fallback <= self.auto_accept
            && self.auto_accept <= 1.0
    }
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Named threshold presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPreset {
    #[default]
    Default,
    Strict,
    Lenient,
}

impl ThresholdPreset {
    /// The threshold triple this preset names.
    pub fn thresholds(&self) -> ConfidenceThresholds {
        match self {
            ThresholdPreset::Default => ConfidenceThresholds::DEFAULT,
            ThresholdPreset::Strict => ConfidenceThresholds::STRICT,
            ThresholdPreset::Lenient => ConfidenceThresholds::LENIENT,
        }
    }

    /// Parse a preset name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Some(ThresholdPreset::Default),
            "strict" => Some(ThresholdPreset::Strict),
            "lenient" => Some(ThresholdPreset::Lenient),
            _ => None,
        }
    }
}

/// Main configuration for the rcpt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Category classification configuration.
    pub classification: ClassificationConfig,

    /// Workflow configuration.
    pub workflow: WorkflowConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Smallest amount the positional total scan will consider plausible.
    pub min_plausible_total: f64,

    /// How many top lines the merchant strategy scores.
    pub merchant_scan_lines: usize,

    /// Default currency when no symbol or code is detected.
    pub default_currency: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_plausible_total: 1.0,
            merchant_scan_lines: 5,
            default_currency: "USD".to_string(),
        }
    }
}

/// Category classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Active threshold preset.
    pub preset: ThresholdPreset,

    /// Remote classifier endpoint; `None` disables the remote stage.
    pub remote_url: Option<String>,

    /// Deadline for one remote call.
    pub remote_timeout_ms: u64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            preset: ThresholdPreset::Default,
            remote_url: None,
            remote_timeout_ms: 3000,
        }
    }
}

/// Workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Run the category classifier after parsing.
    pub use_classifier: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            use_classifier: true,
        }
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> std::result::Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_ordered() {
        for preset in [
            ThresholdPreset::Default,
            ThresholdPreset::Strict,
            ThresholdPreset::Lenient,
        ] {
            let t = preset.thresholds();
            assert!(t.minimum <= t.remote_fallback);
            assert!(t.remote_fallback <= t.auto_accept);
            assert!(t.auto_accept <= 1.0);
        }
    }

    #[test]
    fn test_custom_thresholds_reject_bad_ordering() {
        assert!(ConfidenceThresholds::new(0.5, 0.8, 0.3).is_err());
        assert!(ConfidenceThresholds::new(0.8, 0.5, 0.3).is_ok());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = RcptConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RcptConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.classification.remote_timeout_ms, 3000);
        assert_eq!(back.extraction.merchant_scan_lines, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RcptConfig =
            serde_json::from_str(r#"{"extraction": {"default_currency": "EUR"}}"#).unwrap();
        assert_eq!(config.extraction.default_currency, "EUR");
        assert_eq!(config.extraction.merchant_scan_lines, 5);
        assert!(config.workflow.use_classifier);
    }
}
