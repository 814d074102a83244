use std::collections::HashSet;

use crate::models::Transaction;

pub struct MergeOutcome {
    pub merged: Vec<Transaction>,
    pub added: usize,
    pub duplicates: usize,
}

/// Fold a parsed batch into the existing corpus. Membership is tested
/// against the keys of the original existing set only, so merging the same
/// batch twice adds nothing, while repeated identical movements inside one
/// batch (which real statements do contain) all survive. Append-only:
/// existing records are never touched.
pub fn merge(existing: &[Transaction], incoming: Vec<Transaction>) -> MergeOutcome {
    let existing_keys: HashSet<String> = existing.iter().map(|t| t.unique_key()).collect();

    let mut merged: Vec<Transaction> = existing.to_vec();
    let mut added = 0usize;
    let mut duplicates = 0usize;

    for txn in incoming {
        if existing_keys.contains(&txn.unique_key()) {
            duplicates += 1;
        } else {
            merged.push(txn);
            added += 1;
        }
    }

    MergeOutcome {
        merged,
        added,
        duplicates,
    }
}
