pub mod assign;
pub mod categories;
pub mod categorize;
pub mod demo;
pub mod export;
pub mod import;
pub mod init;
pub mod note;
pub mod register;
pub mod rules;
pub mod stats;

use clap::{Parser, Subcommand};

/// "2024-03" -> (2024, 3). Anything else is treated as "no filter".
pub(crate) fn parse_month_opt(month: &Option<String>) -> Option<(i32, u32)> {
    let m = month.as_ref()?;
    let parts: Vec<&str> = m.split('-').collect();
    if parts.len() == 2 {
        if let (Ok(year), Ok(month)) = (parts[0].parse(), parts[1].parse()) {
            return Some((year, month));
        }
    }
    None
}

#[derive(Parser)]
#[command(name = "hucha", about = "Personal finance ledger for Spanish bank exports.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up hucha: choose a data directory and seed default categories.
    Init {
        /// Path for hucha data (default: ~/Documents/hucha)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a bank export file and auto-categorize its movements.
    Import {
        /// Path to a CSV/XLSX export, statement text file or PDF statement
        file: String,
        /// Format key (csv, xlsx, statement, pdf); sniffed from the
        /// extension when omitted
        #[arg(long)]
        format: Option<String>,
    },
    /// Record a bank push-notification text as a transaction.
    Note {
        /// Notification body
        text: String,
        /// Originating app identifier (used for the source label)
        #[arg(long, default_value = "unknown")]
        app: String,
    },
    /// Re-run categorization over uncategorized transactions.
    Categorize,
    /// Assign a category to a transaction and learn the rule.
    Assign {
        /// Transaction id (shown in `hucha register`)
        id: i64,
        /// Category name
        category: String,
    },
    /// Manage learned categorization rules.
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// List transactions.
    Register {
        /// Month filter: YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Filter by category name
        #[arg(long)]
        category: Option<String>,
    },
    /// Totals and per-category breakdown.
    Stats {
        /// Month filter: YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },
    /// Export transactions (and optionally a summary) to CSV.
    Export {
        /// Output file path
        output: String,
        /// Month filter: YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Also write a per-category summary to this path
        #[arg(long)]
        summary: Option<String>,
    },
    /// Load sample data to explore hucha.
    Demo,
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Learn a rule: concept -> category.
    Add {
        /// Concept text (normalized before storing)
        concept: String,
        /// Category name to assign
        #[arg(long)]
        category: String,
    },
    /// List learned rules in match order.
    List,
    /// Forget the rule for a concept.
    Delete {
        /// Concept text (normalized before lookup)
        concept: String,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Add a category.
    Add {
        /// Category name
        name: String,
        /// Comma-separated keywords, e.g. "mercadona,lidl"
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
    },
    /// List categories.
    List,
    /// Delete a category (default categories are protected).
    Delete {
        /// Category name
        name: String,
    },
}
