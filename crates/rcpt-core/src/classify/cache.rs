//! Classification result cache keyed by normalized merchant name.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::classification::ClassificationResult;

/// Concurrent merchant → result cache.
///
/// Injected into the classifier rather than living as a module-level
/// singleton so tests get an isolated, empty cache per run. Entries are
/// idempotent for a given merchant key, so last-writer-wins on concurrent
/// insert is acceptable.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: RwLock<HashMap<String, ClassificationResult>>,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a merchant name into a cache key: lowercase, alphanumeric
    /// words joined by single spaces.
    pub fn normalize_key(merchant: &str) -> String {
        merchant
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Look up a cached result.
    pub fn get(&self, merchant: &str) -> Option<ClassificationResult> {
        let key = Self::normalize_key(merchant);
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(&key).cloned())
    }

    /// Store a result. A poisoned lock drops the write; the cache is an
    /// optimization, not a source of truth.
    pub fn insert(&self, merchant: &str, result: ClassificationResult) {
        let key = Self::normalize_key(merchant);
        if let Ok(mut map) = self.entries.write() {
            map.insert(key, result);
        }
    }

    /// Number of cached merchants.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classification::Category;
    use std::collections::HashMap as Map;

    #[test]
    fn test_normalize_key() {
        assert_eq!(
            ClassificationCache::normalize_key("  Walmart   Supercenter #42 "),
            "walmart supercenter 42"
        );
        assert_eq!(
            ClassificationCache::normalize_key("TRADER JOE'S"),
            "trader joe s"
        );
    }

    #[test]
    fn test_round_trip_ignores_case_and_punctuation() {
        let cache = ClassificationCache::new();
        let result =
            ClassificationResult::rule_based(Category::Groceries, 0.9, Map::new(), 1);

        cache.insert("Walmart Supercenter", result);
        assert!(cache.get("WALMART  SUPERCENTER").is_some());
        assert!(cache.get("walmart-supercenter").is_some());
        assert!(cache.get("Target").is_none());
        assert_eq!(cache.len(), 1);
    }
}
