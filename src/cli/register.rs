use chrono::Datelike;
use comfy_table::{Cell, Table};

use crate::cli::parse_month_opt;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::get_data_dir;
use crate::store::Store;

pub fn run(month: Option<String>, category: Option<String>) -> Result<()> {
    let store = Store::new(get_data_dir());
    let mut transactions = store.load_transactions()?;
    transactions.sort_by_key(|t| t.date);

    let month_filter = parse_month_opt(&month);

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Concept", "Amount", "Category", "Source"]);
    let mut shown = 0usize;
    for txn in &transactions {
        if let Some((year, month)) = month_filter {
            if txn.date.year() != year || txn.date.month() != month {
                continue;
            }
        }
        if let Some(ref wanted) = category {
            if &txn.category != wanted {
                continue;
            }
        }
        table.add_row(vec![
            Cell::new(txn.id),
            Cell::new(txn.date.format("%d/%m/%Y")),
            Cell::new(&txn.concept),
            Cell::new(money(txn.amount)),
            Cell::new(&txn.category),
            Cell::new(&txn.source),
        ]);
        shown += 1;
    }

    println!("Transactions ({shown})\n{table}");
    Ok(())
}
