use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::settings::get_data_dir;
use crate::store::Store;

pub fn add(name: &str, keywords: &[String]) -> Result<()> {
    let store = Store::new(get_data_dir());
    let category = store.add_category(name, keywords)?;
    println!(
        "Added category '{}' with {} keyword(s)",
        category.name,
        category.keywords.len()
    );
    Ok(())
}

pub fn list() -> Result<()> {
    let store = Store::new(get_data_dir());
    let categories = store.load_categories()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Keywords", "Default"]);
    for category in &categories {
        let keywords: Vec<&str> = category.keywords.iter().map(|k| k.as_str()).collect();
        table.add_row(vec![
            Cell::new(category.id),
            Cell::new(&category.name),
            Cell::new(keywords.join(", ")),
            Cell::new(if category.is_default { "yes" } else { "" }),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn delete(name: &str) -> Result<()> {
    let store = Store::new(get_data_dir());
    store.delete_category(name)?;
    println!("Deleted category '{name}'");
    Ok(())
}
