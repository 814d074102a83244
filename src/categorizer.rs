use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Category, CategorizationRule, Transaction, UNCATEGORIZED};
use crate::normalize::normalize_concept;

/// Learned categorization rules, keyed by normalized concept. Iteration is
/// insertion order, which makes fuzzy matching deterministic: the first
/// structural match wins, ties broken by which rule was learned first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleBook {
    rules: Vec<CategorizationRule>,
}

impl RuleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategorizationRule> {
        self.rules.iter()
    }

    /// Exact lookup by already-normalized concept.
    fn get(&self, normalized: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.concept == normalized)
            .map(|r| r.category.as_str())
    }

    /// Insert or overwrite the mapping for a concept (last write wins). A
    /// re-learned concept keeps its original position so match order stays
    /// stable across corrections.
    pub fn learn(&mut self, concept: &str, category: &str, now: NaiveDateTime) {
        let normalized = normalize_concept(concept);
        if let Some(rule) = self.rules.iter_mut().find(|r| r.concept == normalized) {
            rule.category = category.to_string();
            rule.last_used = now;
        } else {
            self.rules.push(CategorizationRule {
                concept: normalized,
                category: category.to_string(),
                last_used: now,
            });
        }
    }

    /// Drop the rule for a concept. Returns false if none existed.
    pub fn forget(&mut self, concept: &str) -> bool {
        let normalized = normalize_concept(concept);
        let before = self.rules.len();
        self.rules.retain(|r| r.concept != normalized);
        self.rules.len() != before
    }
}

/// Resolve a category for a concept. Precedence: exact rule match, then
/// fuzzy containment against rule keys, then category keywords. `None` is a
/// normal outcome; the caller assigns the "Uncategorized" sentinel.
pub fn categorize(concept: &str, rules: &RuleBook, categories: &[Category]) -> Option<String> {
    let normalized = normalize_concept(concept);

    if let Some(category) = rules.get(&normalized) {
        return Some(category.to_string());
    }

    let concept_lower = normalized.to_lowercase();
    for rule in rules.iter() {
        let rule_lower = rule.concept.to_lowercase();
        if concept_lower.contains(&rule_lower) || rule_lower.contains(&concept_lower) {
            return Some(rule.category.clone());
        }
    }

    for category in categories {
        for keyword in &category.keywords {
            if concept_lower.contains(&keyword.to_lowercase()) {
                return Some(category.name.clone());
            }
        }
    }

    None
}

pub struct CategorizeOutcome {
    pub matched: usize,
    pub unmatched: usize,
}

/// Assign categories to every draft in the batch still carrying the
/// sentinel. Never fails; unmatched drafts simply stay uncategorized.
pub fn categorize_batch(
    transactions: &mut [Transaction],
    rules: &RuleBook,
    categories: &[Category],
) -> CategorizeOutcome {
    let mut matched = 0usize;
    let mut unmatched = 0usize;

    for txn in transactions.iter_mut() {
        if txn.category != UNCATEGORIZED {
            continue;
        }
        match categorize(&txn.concept, rules, categories) {
            Some(category) => {
                txn.category = category;
                matched += 1;
            }
            None => unmatched += 1,
        }
    }

    CategorizeOutcome { matched, unmatched }
}
