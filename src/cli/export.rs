use std::path::Path;

use chrono::Datelike;

use crate::cli::parse_month_opt;
use crate::error::Result;
use crate::export::{export_summary, export_transactions};
use crate::settings::get_data_dir;
use crate::stats::aggregate;
use crate::store::Store;

pub fn run(output: &str, month: Option<String>, summary: Option<String>) -> Result<()> {
    let store = Store::new(get_data_dir());
    let mut transactions = store.load_transactions()?;
    transactions.sort_by_key(|t| t.date);

    let month_filter = parse_month_opt(&month);
    if let Some((year, month)) = month_filter {
        transactions.retain(|t| t.date.year() == year && t.date.month() == month);
    }

    export_transactions(Path::new(output), &transactions)?;
    println!("Exported {} transactions to {output}", transactions.len());

    if let Some(summary_path) = summary {
        let stats = aggregate(&transactions, None);
        export_summary(Path::new(&summary_path), &stats)?;
        println!("Wrote category summary to {summary_path}");
    }
    Ok(())
}
