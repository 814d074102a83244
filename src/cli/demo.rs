use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;

use crate::categorizer::categorize_batch;
use crate::error::Result;
use crate::ledger::merge;
use crate::models::{new_id, Transaction, TransactionType, UNCATEGORIZED};
use crate::settings::get_data_dir;
use crate::store::Store;

struct DemoTxn {
    day: u32,
    concept: &'static str,
    amount: f64,
}

// One typical month of movements; repeated for the last few months with
// some jitter on the variable expenses.
const MONTHLY: &[DemoTxn] = &[
    DemoTxn { day: 1, concept: "NOMINA EMPRESA EJEMPLO SL", amount: 1850.00 },
    DemoTxn { day: 3, concept: "COMPRA MERCADONA VALENCIA", amount: -74.32 },
    DemoTxn { day: 5, concept: "RECIBO DIGI SPAIN TELECOM", amount: -20.00 },
    DemoTxn { day: 7, concept: "NETFLIX.COM", amount: -12.99 },
    DemoTxn { day: 9, concept: "GASOLINERA REPSOL A-3", amount: -55.40 },
    DemoTxn { day: 12, concept: "BIZUM DE MARIA LOPEZ", amount: 25.00 },
    DemoTxn { day: 15, concept: "COMPRA LIDL", amount: -43.18 },
    DemoTxn { day: 18, concept: "RESTAURANTE CASA PACO", amount: -38.50 },
    DemoTxn { day: 21, concept: "AMAZON.ES PEDIDO", amount: -29.90 },
    DemoTxn { day: 25, concept: "RETIRADA CAJERO 1.23.45.67", amount: -50.00 },
];

const MONTHS: u32 = 3;

fn month_offset(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let mut y = year;
    let mut m = month;
    for _ in 0..offset {
        if m == 1 {
            m = 12;
            y -= 1;
        } else {
            m -= 1;
        }
    }
    (y, m)
}

pub fn run() -> Result<()> {
    let store = Store::new(get_data_dir());
    let mut rng = rand::thread_rng();

    let today = Local::now().date_naive();
    let mut batch: Vec<Transaction> = Vec::new();

    for offset in 0..MONTHS {
        let (year, month) = month_offset(today.year(), today.month(), offset);
        for demo in MONTHLY {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, demo.day) else {
                continue;
            };
            // Fixed amounts for income and subscriptions, a few euros of
            // jitter on everything else.
            let amount = if demo.amount > 0.0 || demo.concept.contains("NETFLIX") {
                demo.amount
            } else {
                let cents = rng.gen_range(-300..=300) as f64 / 100.0;
                ((demo.amount + cents) * 100.0).round() / 100.0
            };
            batch.push(Transaction {
                id: new_id(),
                date: date.and_hms_opt(9, 0, 0).unwrap(),
                amount,
                concept: demo.concept.to_string(),
                category: UNCATEGORIZED.to_string(),
                source: "Demo".to_string(),
                kind: if amount < 0.0 {
                    TransactionType::Expense
                } else {
                    TransactionType::Income
                },
                balance: 0.0,
                original_text: format!("Demo: {}", demo.concept),
                is_manual: false,
            });
        }
    }

    let rules = store.load_rules()?;
    let categories = store.load_categories()?;
    let outcome = categorize_batch(&mut batch, &rules, &categories);

    let existing = store.load_transactions()?;
    let result = merge(&existing, batch);
    store.save_transactions(&result.merged)?;

    println!(
        "Demo data: {} movements added ({} duplicates skipped), {} auto-categorized",
        result.added, result.duplicates, outcome.matched
    );
    println!("Try `hucha stats` or `hucha register`.");
    Ok(())
}
