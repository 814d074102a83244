use chrono::Local;
use comfy_table::{Cell, Table};

use crate::error::{HuchaError, Result};
use crate::settings::get_data_dir;
use crate::store::Store;

pub fn add(concept: &str, category: &str) -> Result<()> {
    let store = Store::new(get_data_dir());

    let categories = store.load_categories()?;
    if !categories.iter().any(|c| c.name == category) {
        return Err(HuchaError::UnknownCategory(category.to_string()));
    }

    let mut rules = store.load_rules()?;
    rules.learn(concept, category, Local::now().naive_local());
    store.save_rules(&rules)?;

    println!("Added rule: '{concept}' \u{2192} {category}");
    Ok(())
}

pub fn list() -> Result<()> {
    let store = Store::new(get_data_dir());
    let rules = store.load_rules()?;

    if rules.is_empty() {
        println!("No rules learned yet. Assign a category with `hucha assign`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Concept", "Category", "Last used"]);
    for rule in rules.iter() {
        table.add_row(vec![
            Cell::new(&rule.concept),
            Cell::new(&rule.category),
            Cell::new(rule.last_used.format("%d/%m/%Y")),
        ]);
    }
    println!("Rules ({})\n{table}", rules.len());
    Ok(())
}

pub fn delete(concept: &str) -> Result<()> {
    let store = Store::new(get_data_dir());

    let mut rules = store.load_rules()?;
    if !rules.forget(concept) {
        return Err(HuchaError::Other(format!("No rule for '{concept}'")));
    }
    store.save_rules(&rules)?;

    println!("Forgot rule for '{concept}'");
    Ok(())
}
