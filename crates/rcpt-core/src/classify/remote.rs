//! Remote classification backend.
//!
//! The remote model is an opaque request/response contract. Any failure here
//! is recovered by the classifier falling back to the rule-based prediction.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;
use crate::models::classification::Category;

/// Request payload for one classification call.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

/// Parsed remote reply.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub category: Category,
    pub confidence: f32,
    pub reasoning: Option<String>,
}

/// A remote classification backend.
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    /// Classify one request. Implementations report transport and protocol
    /// problems as errors; they never invent a category.
    async fn classify(&self, request: &RemoteRequest) -> Result<RemoteResponse, ClassifyError>;
}

/// Wire format of the remote reply.
#[derive(Debug, Deserialize)]
struct WireResponse {
    category: String,
    confidence: f32,
    #[serde(default)]
    reasoning: Option<String>,
}

/// HTTP implementation posting JSON to `{base_url}/classify`.
pub struct HttpRemoteClassifier {
    http_client: Client,
    base_url: String,
}

impl HttpRemoteClassifier {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RemoteClassifier for HttpRemoteClassifier {
    async fn classify(&self, request: &RemoteRequest) -> Result<RemoteResponse, ClassifyError> {
        let response = self
            .http_client
            .post(format!("{}/classify", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassifyError::Http(response.error_for_status().unwrap_err()));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::MalformedResponse(e.to_string()))?;

        let category = Category::parse(&wire.category).ok_or_else(|| {
            ClassifyError::MalformedResponse(format!("unknown category: {}", wire.category))
        })?;

        if !(0.0..=1.0).contains(&wire.confidence) {
            return Err(ClassifyError::MalformedResponse(format!(
                "confidence out of range: {}",
                wire.confidence
            )));
        }

        Ok(RemoteResponse {
            category,
            confidence: wire.confidence,
            reasoning: wire.reasoning,
        })
    }
}
