use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::categorizer::RuleBook;
use crate::error::{HuchaError, Result};
use crate::models::{Category, ImportRecord, Transaction, UNCATEGORIZED};

const TRANSACTIONS_FILE: &str = "transactions.json";
const CATEGORIES_FILE: &str = "categories.json";
const RULES_FILE: &str = "rules.json";
const IMPORTS_FILE: &str = "imports.json";

/// JSON-file persistence collaborator. The engine never touches these files
/// directly; it works on the collections the store loads and saves.
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Store {
        Store {
            data_dir: data_dir.into(),
        }
    }

    /// Create the data directory and seed the default categories.
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        self.load_categories()?;
        Ok(())
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn load_transactions(&self) -> Result<Vec<Transaction>> {
        read_json(&self.path(TRANSACTIONS_FILE))
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        write_json(&self.path(TRANSACTIONS_FILE), &transactions)
    }

    /// Missing file seeds (and persists) the default category set.
    pub fn load_categories(&self) -> Result<Vec<Category>> {
        let path = self.path(CATEGORIES_FILE);
        if !path.exists() {
            let defaults = default_categories();
            self.save_categories(&defaults)?;
            return Ok(defaults);
        }
        read_json(&path)
    }

    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        write_json(&self.path(CATEGORIES_FILE), &categories)
    }

    pub fn add_category(&self, name: &str, keywords: &[String]) -> Result<Category> {
        let mut categories = self.load_categories()?;
        if categories.iter().any(|c| c.name == name) {
            return Err(HuchaError::Other(format!(
                "Category '{name}' already exists"
            )));
        }
        let id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let category = Category {
            id,
            name: name.to_string(),
            keywords: keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect::<BTreeSet<_>>(),
            is_default: false,
        };
        categories.push(category.clone());
        self.save_categories(&categories)?;
        Ok(category)
    }

    /// Default categories cannot be deleted; "Uncategorized" in particular
    /// is load-bearing for the whole draft flow.
    pub fn delete_category(&self, name: &str) -> Result<()> {
        let mut categories = self.load_categories()?;
        let Some(category) = categories.iter().find(|c| c.name == name) else {
            return Err(HuchaError::UnknownCategory(name.to_string()));
        };
        if category.is_default {
            return Err(HuchaError::Other(format!(
                "'{name}' is a default category and cannot be deleted"
            )));
        }
        categories.retain(|c| c.name != name);
        self.save_categories(&categories)
    }

    pub fn load_rules(&self) -> Result<RuleBook> {
        read_json(&self.path(RULES_FILE))
    }

    pub fn save_rules(&self, rules: &RuleBook) -> Result<()> {
        write_json(&self.path(RULES_FILE), rules)
    }

    pub fn load_imports(&self) -> Result<Vec<ImportRecord>> {
        read_json(&self.path(IMPORTS_FILE))
    }

    pub fn record_import(&self, record: ImportRecord) -> Result<()> {
        let mut imports = self.load_imports()?;
        imports.push(record);
        write_json(&self.path(IMPORTS_FILE), &imports)
    }

    /// Whole-file duplicate check by checksum, cheaper than parsing and
    /// merging a statement that was already ingested.
    pub fn is_file_imported(&self, checksum: &str) -> Result<bool> {
        Ok(self
            .load_imports()?
            .iter()
            .any(|record| record.checksum == checksum))
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn file_checksum(path: &Path) -> Result<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn category(id: i64, name: &str, keywords: &[&str]) -> Category {
    Category {
        id,
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect::<BTreeSet<_>>(),
        is_default: true,
    }
}

/// Fixed starter set, seeded once by the store on first use. Keywords stay
/// in Spanish, which is what the bank text contains.
pub fn default_categories() -> Vec<Category> {
    vec![
        category(1, "Groceries", &["mercadona", "carrefour", "supermercado", "lidl", "aldi", "consum"]),
        category(2, "Dining", &["restaurante", "bar", "pizzeria", "burger", "comida", "dominos"]),
        category(3, "Transport", &["gasolina", "repsol", "cepsa", "plenoil", "plenergy", "uber", "cabify"]),
        category(4, "Leisure", &["cine", "amazon", "netflix", "spotify", "steam"]),
        category(5, "Utilities", &["recibo", "domiciliación", "digi", "movistar", "endesa"]),
        category(6, "Transfers", &["transferencia", "traspaso"]),
        category(7, "Bizum", &["bizum"]),
        category(8, "Online Shopping", &["paypal", "amazon", "aliexpress", "alipay"]),
        category(9, "ATM", &["cajero", "atm", "ingreso anonimo"]),
        category(10, "Payroll", &["nomina", "abono nomina"]),
        category(11, UNCATEGORIZED, &[]),
    ]
}
