mod categorizer;
mod cli;
mod error;
mod export;
mod fmt;
mod importer;
mod ledger;
mod models;
mod normalize;
mod notification;
mod settings;
mod stats;
mod store;

use clap::Parser;

use cli::{CategoriesCommands, Cli, Commands, RulesCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { file, format } => cli::import::run(&file, format.as_deref()),
        Commands::Note { text, app } => cli::note::run(&text, &app),
        Commands::Categorize => cli::categorize::run(),
        Commands::Assign { id, category } => cli::assign::run(id, &category),
        Commands::Rules { command } => match command {
            RulesCommands::Add { concept, category } => cli::rules::add(&concept, &category),
            RulesCommands::List => cli::rules::list(),
            RulesCommands::Delete { concept } => cli::rules::delete(&concept),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::Add { name, keywords } => cli::categories::add(&name, &keywords),
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Delete { name } => cli::categories::delete(&name),
        },
        Commands::Register { month, category } => cli::register::run(month, category),
        Commands::Stats { month } => cli::stats::run(month),
        Commands::Export {
            output,
            month,
            summary,
        } => cli::export::run(&output, month, summary),
        Commands::Demo => cli::demo::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
