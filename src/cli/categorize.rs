use crate::categorizer::categorize_batch;
use crate::error::Result;
use crate::settings::get_data_dir;
use crate::store::Store;

pub fn run() -> Result<()> {
    let store = Store::new(get_data_dir());

    let mut transactions = store.load_transactions()?;
    let rules = store.load_rules()?;
    let categories = store.load_categories()?;

    let outcome = categorize_batch(&mut transactions, &rules, &categories);
    store.save_transactions(&transactions)?;

    println!(
        "{} categorized, {} still uncategorized",
        outcome.matched, outcome.unmatched
    );
    Ok(())
}
