use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::normalize::truncate_chars;

/// Sentinel category assigned to drafts until the categorizer (or the user)
/// picks a real one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Concept prefix length used in the dedup key.
const KEY_CONCEPT_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDateTime,
    /// Signed amount; negative = outflow.
    pub amount: f64,
    pub concept: String,
    #[serde(default = "default_category")]
    pub category: String,
    /// Origin label: "CSV", "Excel", "Santander", "Google Wallet", ...
    pub source: String,
    pub kind: TransactionType,
    /// Running balance after the movement, when the source reports one.
    #[serde(default)]
    pub balance: f64,
    /// Raw source excerpt kept for audit.
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub is_manual: bool,
}

fn default_category() -> String {
    UNCATEGORIZED.to_string()
}

impl Transaction {
    /// Dedup key: exact instant, concept prefix, two-decimal amount.
    /// Two transactions are duplicates iff their keys are equal.
    pub fn unique_key(&self) -> String {
        let millis = self.date.and_utc().timestamp_millis();
        format!(
            "{millis}-{}-{:.2}",
            truncate_chars(&self.concept, KEY_CONCEPT_LEN),
            self.amount
        )
    }
}

/// Fresh transaction id. Random 63-bit values; ids are never reused and the
/// collision odds over a ledger's lifetime are negligible.
pub fn new_id() -> i64 {
    (rand::random::<u64>() >> 1) as i64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Lowercase keywords matched against normalized concepts.
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    /// Default categories are seeded by the store and cannot be deleted.
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizationRule {
    /// Normalized concept this rule was learned from.
    pub concept: String,
    pub category: String,
    pub last_used: NaiveDateTime,
}

/// One import run, kept as an audit trail and for whole-file duplicate
/// detection by checksum.
#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub filename: String,
    pub checksum: String,
    pub imported: usize,
    pub duplicates: usize,
    pub imported_at: NaiveDateTime,
}
