//! Hybrid category classifier: rule stage, remote escalation, fallback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::classification::ClassificationResult;
use crate::models::config::ConfidenceThresholds;

use super::cache::ClassificationCache;
use super::remote::{RemoteClassifier, RemoteRequest};
use super::rules::{RuleClassifier, RulePrediction};

/// Confidence multiplier applied when the remote prediction overrides a
/// disagreeing rule prediction; keeps the final confidence at or below the
/// remote's own report.
const DISAGREEMENT_PENALTY: f32 = 0.85;

/// Ceiling for boosted consensus confidence.
const CONSENSUS_CAP: f32 = 0.99;

/// One classification request.
#[derive(Debug, Clone, Default)]
pub struct ClassificationRequest {
    pub merchant: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
}

/// Category classifier combining rule scoring with an optional remote model.
///
/// `classify` is total: every path ends in a result, possibly a
/// low-confidence rule fallback. Remote failures and timeouts are silent.
pub struct CategoryClassifier {
    rules: RuleClassifier,
    remote: Option<Arc<dyn RemoteClassifier>>,
    cache: Arc<ClassificationCache>,
    remote_timeout: Duration,
}

impl CategoryClassifier {
    /// Rule-only classifier with an isolated cache.
    pub fn new() -> Self {
        Self {
            rules: RuleClassifier::new(),
            remote: None,
            cache: Arc::new(ClassificationCache::new()),
            remote_timeout: Duration::from_secs(3),
        }
    }

    /// Attach a remote backend.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteClassifier>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Use a shared cache.
    pub fn with_cache(mut self, cache: Arc<ClassificationCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Override the remote call deadline.
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Classify one request under the given thresholds.
    pub async fn classify(
        &self,
        request: &ClassificationRequest,
        thresholds: &ConfidenceThresholds,
    ) -> ClassificationResult {
        let start = Instant::now();

        if let Some(merchant) = request.merchant.as_deref() {
            if let Some(mut cached) = self.cache.get(merchant) {
                debug!("classification cache hit for {:?}", merchant);
                cached.processing_time_ms = start.elapsed().as_millis() as u64;
                return cached;
            }
        }

        let rule = self
            .rules
            .classify(request.merchant.as_deref(), request.description.as_deref());

        let result = if rule.confidence >= thresholds.auto_accept {
            // Fast path: the rules are confident enough on their own.
            rule_result(&rule, start)
        } else if rule.confidence >= thresholds.minimum {
            self.escalate(request, &rule, thresholds, start).await
        } else {
            // Too little signal to justify a remote call; the caller sees
            // the low confidence and routes to review.
            rule_result(&rule, start)
        };

        if let Some(merchant) = request.merchant.as_deref() {
            self.cache.insert(merchant, result.clone());
        }

        result
    }

    /// Escalation stage: consult the remote model and reconcile.
    async fn escalate(
        &self,
        request: &ClassificationRequest,
        rule: &RulePrediction,
        thresholds: &ConfidenceThresholds,
        start: Instant,
    ) -> ClassificationResult {
        let Some(remote) = self.remote.as_ref() else {
            return rule_result(rule, start);
        };

        let remote_request = RemoteRequest {
            merchant: request.merchant.clone(),
            description: request.description.clone(),
            amount: request.amount,
        };

        let reply =
            tokio::time::timeout(self.remote_timeout, remote.classify(&remote_request)).await;

        match reply {
            Ok(Ok(remote_reply)) => {
                if remote_reply.category == rule.category {
                    // Consensus: boost toward 1.0, strictly above either
                    // individual confidence.
                    let confidence = (1.0
                        - (1.0 - rule.confidence) * (1.0 - remote_reply.confidence))
                        .min(CONSENSUS_CAP);
                    ClassificationResult::hybrid(
                        rule.category,
                        confidence,
                        rule.category,
                        rule.confidence,
                        remote_reply.category,
                        remote_reply.confidence,
                        remote_reply.reasoning,
                        rule.scores.clone(),
                        start.elapsed().as_millis() as u64,
                    )
                } else if remote_reply.confidence >= thresholds.remote_fallback {
                    // Disagreement: the remote prediction wins, confidence
                    // capped by its own report.
                    let confidence = remote_reply.confidence * DISAGREEMENT_PENALTY;
                    ClassificationResult::hybrid(
                        remote_reply.category,
                        confidence,
                        rule.category,
                        rule.confidence,
                        remote_reply.category,
                        remote_reply.confidence,
                        remote_reply.reasoning,
                        rule.scores.clone(),
                        start.elapsed().as_millis() as u64,
                    )
                } else {
                    // The remote is less sure than the disagreement warrants.
                    debug!(
                        "remote prediction {:?} below remote_fallback, keeping rule result",
                        remote_reply.category
                    );
                    rule_result(rule, start)
                }
            }
            Ok(Err(e)) => {
                warn!("remote classification failed: {}, using rule result", e);
                rule_result(rule, start)
            }
            Err(_) => {
                warn!(
                    "remote classification timed out after {}ms, using rule result",
                    self.remote_timeout.as_millis()
                );
                rule_result(rule, start)
            }
        }
    }
}

/// The rule prediction as a final result, used for both the fast path and
/// every fallback.
fn rule_result(rule: &RulePrediction, start: Instant) -> ClassificationResult {
    ClassificationResult::rule_based(
        rule.category,
        rule.confidence,
        rule.scores.clone(),
        start.elapsed().as_millis() as u64,
    )
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}
