use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::parse_month_opt;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::get_data_dir;
use crate::stats::{aggregate, available_months};
use crate::store::Store;

pub fn run(month: Option<String>) -> Result<()> {
    let store = Store::new(get_data_dir());
    let transactions = store.load_transactions()?;

    let month_filter = parse_month_opt(&month);
    let stats = aggregate(&transactions, month_filter);

    match month_filter {
        Some((year, month)) => println!("Statistics for {year:04}-{month:02}"),
        None => println!("Statistics (all time)"),
    }
    println!(
        "  Income:   {} ({} movements)",
        money(stats.total_income).green(),
        stats.income_count
    );
    println!(
        "  Expenses: {} ({} movements)",
        money(stats.total_expenses).red(),
        stats.expense_count
    );
    println!(
        "  Net:      {}",
        money(stats.total_income - stats.total_expenses)
    );
    println!("  Movements: {}", stats.transaction_count);

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount"]);
    for (name, amount) in stats.breakdown_desc() {
        table.add_row(vec![Cell::new(name), Cell::new(money(amount))]);
    }
    println!("\nBy category\n{table}");

    if month_filter.is_none() {
        let months: Vec<String> = available_months(&transactions)
            .iter()
            .map(|(y, m)| format!("{y:04}-{m:02}"))
            .collect();
        if !months.is_empty() {
            println!("\nMonths with data: {}", months.join(", "));
        }
    }
    Ok(())
}
