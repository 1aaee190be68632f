//! Category classification module: rule stage, optional remote escalation,
//! and the hybrid consensus policy.

pub mod cache;
mod classifier;
pub mod remote;
pub mod rules;

pub use cache::ClassificationCache;
pub use classifier::{CategoryClassifier, ClassificationRequest};
pub use remote::{HttpRemoteClassifier, RemoteClassifier, RemoteRequest, RemoteResponse};
pub use rules::{RuleClassifier, RulePrediction};
