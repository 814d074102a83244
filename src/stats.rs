use std::collections::HashMap;

use chrono::Datelike;

use crate::models::{Transaction, TransactionType};

/// Derived view over a transaction set; recomputed on demand, never
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct TransactionStatistics {
    /// Sum of absolute amounts over Expense-typed transactions.
    pub total_expenses: f64,
    /// Sum of amounts over Income-typed transactions.
    pub total_income: f64,
    pub transaction_count: usize,
    pub expense_count: usize,
    pub income_count: usize,
    /// Category name -> summed absolute amount, over all included
    /// transactions (not only expenses).
    pub categories_breakdown: HashMap<String, f64>,
}

impl TransactionStatistics {
    /// Breakdown ordered by descending amount, for presentation.
    pub fn breakdown_desc(&self) -> Vec<(String, f64)> {
        let mut items: Vec<(String, f64)> = self
            .categories_breakdown
            .iter()
            .map(|(name, amount)| (name.clone(), *amount))
            .collect();
        items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        items
    }
}

/// Compute totals and the per-category breakdown, optionally restricted to
/// one calendar month.
pub fn aggregate(
    transactions: &[Transaction],
    month: Option<(i32, u32)>,
) -> TransactionStatistics {
    let included: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| match month {
            Some((year, month)) => t.date.year() == year && t.date.month() == month,
            None => true,
        })
        .collect();

    let mut stats = TransactionStatistics {
        transaction_count: included.len(),
        ..Default::default()
    };

    for txn in &included {
        match txn.kind {
            TransactionType::Expense => {
                stats.total_expenses += txn.amount.abs();
                stats.expense_count += 1;
            }
            TransactionType::Income => {
                stats.total_income += txn.amount;
                stats.income_count += 1;
            }
            TransactionType::Unknown => {}
        }
        *stats
            .categories_breakdown
            .entry(txn.category.clone())
            .or_default() += txn.amount.abs();
    }

    stats
}

/// Distinct (year, month) pairs present in the corpus, newest first.
pub fn available_months(transactions: &[Transaction]) -> Vec<(i32, u32)> {
    let mut months: Vec<(i32, u32)> = transactions
        .iter()
        .map(|t| (t.date.year(), t.date.month()))
        .collect();
    months.sort_unstable();
    months.dedup();
    months.reverse();
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{new_id, UNCATEGORIZED};
    use chrono::NaiveDate;

    fn txn(ym: (i32, u32), day: u32, amount: f64, kind: TransactionType, category: &str) -> Transaction {
        Transaction {
            id: new_id(),
            date: NaiveDate::from_ymd_opt(ym.0, ym.1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            amount,
            concept: "X".to_string(),
            category: category.to_string(),
            source: "CSV".to_string(),
            kind,
            balance: 0.0,
            original_text: String::new(),
            is_manual: false,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn((2024, 3), 1, -45.20, TransactionType::Expense, "Groceries"),
            txn((2024, 3), 2, -12.99, TransactionType::Expense, "Leisure"),
            txn((2024, 3), 28, 1500.00, TransactionType::Income, "Payroll"),
            txn((2024, 4), 1, -30.00, TransactionType::Expense, "Groceries"),
            txn((2024, 4), 5, 20.00, TransactionType::Unknown, UNCATEGORIZED),
        ]
    }

    #[test]
    fn test_aggregate_totals() {
        let stats = aggregate(&sample(), None);
        assert!((stats.total_expenses - 88.19).abs() < 1e-9);
        assert!((stats.total_income - 1500.0).abs() < 1e-9);
        assert_eq!(stats.transaction_count, 5);
        assert_eq!(stats.expense_count, 3);
        assert_eq!(stats.income_count, 1);
    }

    #[test]
    fn test_unknown_kind_excluded_from_totals_but_in_breakdown() {
        let stats = aggregate(&sample(), None);
        assert_eq!(stats.categories_breakdown[UNCATEGORIZED], 20.0);
    }

    #[test]
    fn test_aggregate_month_filter() {
        let stats = aggregate(&sample(), Some((2024, 3)));
        assert_eq!(stats.transaction_count, 3);
        assert!((stats.total_expenses - 58.19).abs() < 1e-9);
        assert!((stats.total_income - 1500.0).abs() < 1e-9);
        assert!(!stats.categories_breakdown.contains_key(UNCATEGORIZED));
    }

    #[test]
    fn test_aggregate_empty_month() {
        let stats = aggregate(&sample(), Some((2023, 1)));
        assert_eq!(stats.transaction_count, 0);
        assert_eq!(stats.total_expenses, 0.0);
        assert!(stats.categories_breakdown.is_empty());
    }

    #[test]
    fn test_breakdown_sums_absolute_amounts() {
        let stats = aggregate(&sample(), None);
        assert!((stats.categories_breakdown["Groceries"] - 75.20).abs() < 1e-9);
        assert!((stats.categories_breakdown["Payroll"] - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_desc_ordering() {
        let stats = aggregate(&sample(), None);
        let ordered = stats.breakdown_desc();
        assert_eq!(ordered[0].0, "Payroll");
        assert_eq!(ordered[1].0, "Groceries");
        let amounts: Vec<f64> = ordered.iter().map(|(_, a)| *a).collect();
        let mut sorted = amounts.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(amounts, sorted);
    }

    #[test]
    fn test_available_months_newest_first() {
        assert_eq!(available_months(&sample()), vec![(2024, 4), (2024, 3)]);
        assert!(available_months(&[]).is_empty());
    }
}
