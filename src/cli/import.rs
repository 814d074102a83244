use std::path::PathBuf;

use chrono::Local;

use crate::categorizer::categorize_batch;
use crate::error::{HuchaError, Result};
use crate::importer::SourceFormat;
use crate::ledger::merge;
use crate::models::ImportRecord;
use crate::settings::get_data_dir;
use crate::store::{file_checksum, Store};

pub fn run(file: &str, format: Option<&str>) -> Result<()> {
    let path = PathBuf::from(file);
    let format = match format {
        Some(key) => SourceFormat::from_key(key)
            .ok_or_else(|| HuchaError::UnsupportedFormat(key.to_string()))?,
        None => SourceFormat::sniff(&path)
            .ok_or_else(|| HuchaError::UnsupportedFormat(path.display().to_string()))?,
    };

    let store = Store::new(get_data_dir());

    let checksum = file_checksum(&path)?;
    if store.is_file_imported(&checksum)? {
        println!("This file has already been imported (duplicate checksum).");
        return Ok(());
    }

    let mut batch = format.parse(&path)?;
    let parsed = batch.len();

    let rules = store.load_rules()?;
    let categories = store.load_categories()?;
    let outcome = categorize_batch(&mut batch, &rules, &categories);

    let existing = store.load_transactions()?;
    let result = merge(&existing, batch);
    store.save_transactions(&result.merged)?;

    store.record_import(ImportRecord {
        filename: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string(),
        checksum,
        imported: result.added,
        duplicates: result.duplicates,
        imported_at: Local::now().naive_local(),
    })?;

    println!("{parsed} movements parsed ({})", format.name());
    println!(
        "{} added, {} duplicates skipped",
        result.added, result.duplicates
    );
    println!(
        "{} categorized, {} left uncategorized",
        outcome.matched, outcome.unmatched
    );
    Ok(())
}
