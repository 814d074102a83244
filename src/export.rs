use std::path::Path;

use crate::error::Result;
use crate::models::Transaction;
use crate::stats::TransactionStatistics;

/// Write the transaction register as a CSV spreadsheet. One-way consumer of
/// the data model; amounts keep their machine form so the file re-imports
/// cleanly elsewhere.
pub fn export_transactions(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Fecha", "Concepto", "Importe", "Saldo", "Categoria", "Tipo", "Origen",
    ])?;
    for txn in transactions {
        writer.write_record([
            txn.date.format("%d/%m/%Y").to_string(),
            txn.concept.clone(),
            format!("{:.2}", txn.amount),
            format!("{:.2}", txn.balance),
            txn.category.clone(),
            format!("{:?}", txn.kind),
            txn.source.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the per-category summary of a statistics view.
pub fn export_summary(path: &Path, stats: &TransactionStatistics) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Categoria", "Importe"])?;
    for (name, amount) in stats.breakdown_desc() {
        writer.write_record([name, format!("{amount:.2}")])?;
    }
    writer.write_record(["Total gastos".to_string(), format!("{:.2}", stats.total_expenses)])?;
    writer.write_record(["Total ingresos".to_string(), format!("{:.2}", stats.total_income)])?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{new_id, TransactionType, UNCATEGORIZED};
    use crate::stats::aggregate;
    use chrono::NaiveDate;

    fn txn(concept: &str, amount: f64, category: &str) -> Transaction {
        Transaction {
            id: new_id(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            amount,
            concept: concept.to_string(),
            category: category.to_string(),
            source: "CSV".to_string(),
            kind: if amount < 0.0 {
                TransactionType::Expense
            } else {
                TransactionType::Income
            },
            balance: 0.0,
            original_text: String::new(),
            is_manual: false,
        }
    }

    #[test]
    fn test_export_transactions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        let txns = vec![
            txn("MERCADONA", -45.20, "Groceries"),
            txn("NOMINA EMPRESA", 1500.0, "Payroll"),
        ];
        export_transactions(&path, &txns).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Fecha,Concepto,Importe,Saldo,Categoria,Tipo,Origen"
        );
        assert_eq!(
            lines.next().unwrap(),
            "01/03/2024,MERCADONA,-45.20,0.00,Groceries,Expense,CSV"
        );
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_export_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let txns = vec![
            txn("MERCADONA", -45.20, "Groceries"),
            txn("CINE", -12.00, "Leisure"),
            txn("SIN CAT", -1.00, UNCATEGORIZED),
        ];
        export_summary(&path, &aggregate(&txns, None)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Categoria,Importe\n"));
        assert!(content.contains("Groceries,45.20"));
        assert!(content.contains("Total gastos,58.20"));
        assert!(content.contains("Total ingresos,0.00"));
    }
}
