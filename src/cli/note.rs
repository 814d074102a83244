use chrono::Local;

use crate::categorizer::categorize_batch;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger::merge;
use crate::notification::parse_notification;
use crate::settings::get_data_dir;
use crate::store::Store;

pub fn run(text: &str, app: &str) -> Result<()> {
    let store = Store::new(get_data_dir());

    let txn = parse_notification(text, app, Local::now().naive_local())?;
    let mut batch = vec![txn];

    let rules = store.load_rules()?;
    let categories = store.load_categories()?;
    categorize_batch(&mut batch, &rules, &categories);

    let existing = store.load_transactions()?;
    let result = merge(&existing, batch);

    if result.added == 0 {
        println!("Duplicate notification ignored.");
        return Ok(());
    }

    store.save_transactions(&result.merged)?;
    if let Some(txn) = result.merged.last() {
        println!(
            "Recorded {} \u{2014} {} ({}) from {}",
            money(txn.amount),
            txn.concept,
            txn.category,
            txn.source
        );
    }
    Ok(())
}
