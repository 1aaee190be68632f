//! Rule-based category scoring over merchant names and descriptions.

use std::collections::HashMap;

use crate::models::classification::Category;

/// Known merchants. A hit contributes a strong score to its category.
const MERCHANT_TABLE: &[(&str, Category)] = &[
    ("walmart", Category::Groceries),
    ("kroger", Category::Groceries),
    ("safeway", Category::Groceries),
    ("whole foods", Category::Groceries),
    ("trader joe", Category::Groceries),
    ("aldi", Category::Groceries),
    ("costco", Category::Groceries),
    ("publix", Category::Groceries),
    ("mcdonald", Category::Dining),
    ("burger king", Category::Dining),
    ("starbucks", Category::Dining),
    ("subway", Category::Dining),
    ("chipotle", Category::Dining),
    ("domino", Category::Dining),
    ("uber", Category::Transportation),
    ("lyft", Category::Transportation),
    ("shell", Category::Transportation),
    ("chevron", Category::Transportation),
    ("exxon", Category::Transportation),
    ("amazon", Category::Shopping),
    ("target", Category::Shopping),
    ("best buy", Category::Shopping),
    ("ikea", Category::Shopping),
    ("home depot", Category::Shopping),
    ("netflix", Category::Entertainment),
    ("spotify", Category::Entertainment),
    ("amc", Category::Entertainment),
    ("cvs", Category::Health),
    ("walgreens", Category::Health),
    ("rite aid", Category::Health),
    ("comcast", Category::Utilities),
    ("verizon", Category::Utilities),
    ("at&t", Category::Utilities),
    ("delta", Category::Travel),
    ("united airlines", Category::Travel),
    ("marriott", Category::Travel),
    ("hilton", Category::Travel),
    ("airbnb", Category::Travel),
];

/// Generic category keywords. Weaker signal than a known merchant.
const KEYWORD_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Groceries,
        &["grocery", "groceries", "supermarket", "market", "produce", "food", "deli"],
    ),
    (
        Category::Dining,
        &["restaurant", "cafe", "coffee", "diner", "pizza", "burger", "bar", "grill", "bakery"],
    ),
    (
        Category::Transportation,
        &["gas", "fuel", "parking", "taxi", "transit", "toll", "rideshare"],
    ),
    (
        Category::Shopping,
        &["clothing", "apparel", "electronics", "department", "retail", "mall", "furniture"],
    ),
    (
        Category::Entertainment,
        &["cinema", "movie", "theater", "concert", "game", "streaming", "arcade"],
    ),
    (
        Category::Health,
        &["pharmacy", "drug", "clinic", "dental", "medical", "doctor", "hospital"],
    ),
    (
        Category::Utilities,
        &["electric", "water", "internet", "cable", "utility", "wireless"],
    ),
    (
        Category::Travel,
        &["hotel", "motel", "airline", "flight", "rental", "resort"],
    ),
    (
        Category::Education,
        &["tuition", "school", "university", "course", "books", "bookstore"],
    ),
];

const MERCHANT_HIT_SCORE: f32 = 0.9;
const MERCHANT_KEYWORD_SCORE: f32 = 0.4;
const DESCRIPTION_KEYWORD_SCORE: f32 = 0.3;

/// Rule-stage prediction.
#[derive(Debug, Clone)]
pub struct RulePrediction {
    pub category: Category,
    pub confidence: f32,
    /// Score per candidate category.
    pub scores: HashMap<Category, f32>,
}

/// Rule-based category classifier. Pure table lookup; no state.
#[derive(Debug, Default)]
pub struct RuleClassifier;

impl RuleClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Score merchant and description against the category tables and return
    /// the best candidate. Always returns a prediction; with no signal the
    /// category is `Other` at confidence 0.
    pub fn classify(&self, merchant: Option<&str>, description: Option<&str>) -> RulePrediction {
        let mut scores: HashMap<Category, f32> = HashMap::new();

        if let Some(merchant) = merchant {
            let lower = merchant.to_lowercase();

            for (name, category) in MERCHANT_TABLE {
                if lower.contains(name) {
                    *scores.entry(*category).or_default() += MERCHANT_HIT_SCORE;
                }
            }

            for (category, keywords) in KEYWORD_TABLE {
                if keywords.iter().any(|k| lower.contains(k)) {
                    *scores.entry(*category).or_default() += MERCHANT_KEYWORD_SCORE;
                }
            }
        }

        if let Some(description) = description {
            let lower = description.to_lowercase();

            for (category, keywords) in KEYWORD_TABLE {
                if keywords.iter().any(|k| lower.contains(k)) {
                    *scores.entry(*category).or_default() += DESCRIPTION_KEYWORD_SCORE;
                }
            }
        }

        let best = scores
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(category, score)| (*category, *score));

        match best {
            Some((category, score)) => RulePrediction {
                category,
                confidence: score.min(0.95),
                scores,
            },
            None => RulePrediction {
                category: Category::Other,
                confidence: 0.0,
                scores,
            },
        }
    }
}
