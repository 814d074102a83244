use chrono::Local;

use crate::error::{HuchaError, Result};
use crate::normalize::normalize_concept;
use crate::settings::get_data_dir;
use crate::store::Store;

pub fn run(id: i64, category: &str) -> Result<()> {
    let store = Store::new(get_data_dir());

    let categories = store.load_categories()?;
    if !categories.iter().any(|c| c.name == category) {
        return Err(HuchaError::UnknownCategory(category.to_string()));
    }

    let mut transactions = store.load_transactions()?;
    let Some(txn) = transactions.iter_mut().find(|t| t.id == id) else {
        return Err(HuchaError::Other(format!("No transaction with id {id}")));
    };
    txn.category = category.to_string();
    let concept = txn.concept.clone();

    // Every manual assignment becomes a rule, so the next import gets it
    // right on its own.
    let mut rules = store.load_rules()?;
    rules.learn(&concept, category, Local::now().naive_local());

    store.save_transactions(&transactions)?;
    store.save_rules(&rules)?;

    println!(
        "Assigned '{category}' and learned rule '{}' \u{2192} {category}",
        normalize_concept(&concept)
    );
    Ok(())
}
