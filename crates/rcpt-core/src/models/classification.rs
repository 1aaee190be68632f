//! Classification result models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Closed set of spending categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Dining,
    Transportation,
    Shopping,
    Entertainment,
    Health,
    Utilities,
    Travel,
    Education,
    /// Fallback for anything the tables cannot place.
    Other,
}

impl Category {
    /// Every category, in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Groceries,
            Category::Dining,
            Category::Transportation,
            Category::Shopping,
            Category::Entertainment,
            Category::Health,
            Category::Utilities,
            Category::Travel,
            Category::Education,
            Category::Other,
        ]
    }

    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Dining => "Dining",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Utilities => "Utilities",
            Category::Travel => "Travel",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }

    /// Parse a category name, case-insensitively. Unknown names yield `None`
    /// so callers can decide whether that is a malformed reply or a fallback.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "groceries" | "grocery" => Some(Category::Groceries),
            "dining" | "food" | "restaurants" => Some(Category::Dining),
            "transportation" | "transport" => Some(Category::Transportation),
            "shopping" => Some(Category::Shopping),
            "entertainment" => Some(Category::Entertainment),
            "health" | "healthcare" => Some(Category::Health),
            "utilities" => Some(Category::Utilities),
            "travel" => Some(Category::Travel),
            "education" => Some(Category::Education),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a classification decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationMethod {
    /// Keyword/merchant rules alone, either as the fast path or as the
    /// fallback when the remote stage was unavailable or unsure.
    #[serde(rename = "rule-based")]
    RuleBased,

    /// Remote model alone. Part of the closed output contract; the current
    /// policy always pairs a remote answer with a rule prediction.
    #[serde(rename = "remote-model")]
    RemoteModel,

    /// Rule and remote predictions reconciled by consensus.
    #[serde(rename = "hybrid")]
    Hybrid,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::RuleBased => "rule-based",
            ClassificationMethod::RemoteModel => "remote-model",
            ClassificationMethod::Hybrid => "hybrid",
        }
    }
}

/// Result of classifying one receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Chosen category.
    pub category: Category,

    /// Confidence in the chosen category (0.0 - 1.0).
    pub confidence: f32,

    /// Decision method.
    pub method: ClassificationMethod,

    /// Rule-stage prediction, when the rule stage produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_prediction: Option<Category>,

    /// Rule-stage confidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_confidence: Option<f32>,

    /// Remote prediction, when a remote call succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_prediction: Option<Category>,

    /// Remote-reported confidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_confidence: Option<f32>,

    /// Free-text reasoning from the remote model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Per-category rule scores.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub candidate_scores: HashMap<Category, f32>,

    /// Wall-clock classification time.
    pub processing_time_ms: u64,
}

impl ClassificationResult {
    /// A rule-only result (fast path or fallback).
    pub fn rule_based(
        category: Category,
        confidence: f32,
        candidate_scores: HashMap<Category, f32>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            category,
            confidence,
            method: ClassificationMethod::RuleBased,
            rule_prediction: Some(category),
            rule_confidence: Some(confidence),
            remote_prediction: None,
            remote_confidence: None,
            reasoning: None,
            candidate_scores,
            processing_time_ms,
        }
    }

    /// A hybrid result. Requires both predictions, enforcing the invariant
    /// that `method == Hybrid` always carries rule and remote fields.
    #[allow(clippy::too_many_arguments)]
    pub fn hybrid(
        category: Category,
        confidence: f32,
        rule_prediction: Category,
        rule_confidence: f32,
        remote_prediction: Category,
        remote_confidence: f32,
        reasoning: Option<String>,
        candidate_scores: HashMap<Category, f32>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            category,
            confidence,
            method: ClassificationMethod::Hybrid,
            rule_prediction: Some(rule_prediction),
            rule_confidence: Some(rule_confidence),
            remote_prediction: Some(remote_prediction),
            remote_confidence: Some(remote_confidence),
            reasoning,
            candidate_scores,
            processing_time_ms,
        }
    }
}
