use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::{HuchaError, Result};
use crate::models::{new_id, Transaction, TransactionType, UNCATEGORIZED};
use crate::normalize::truncate_chars;

const MAX_CONCEPT_LEN: usize = 50;

// Ordered: the first matching pattern wins. Generic euro notations first,
// then the phrase-anchored variants some banks use.
const AMOUNT_PATTERNS: &[&str] = &[
    r"(\d{1,3}(?:[.,]\d{3})*[.,]\d{2})\s*€",
    r"€\s*(\d{1,3}(?:[.,]\d{3})*[.,]\d{2})",
    r"(?i)(\d+[.,]\d{2})\s*EUR",
    r"(?i)(\d+[.,]\d{2})\s*euros?",
    r"(?i)(\d+[.,]\d{2})EUR",
    r"(?i)BIZUM de (\d+[.,]\d{2}) EUR",
    r"(?i)de efectivo de (\d+[.,]\d{2})EUR",
    r"(?i)ingreso de efectivo de (\d+[.,]\d{2})EUR",
];

// Charge keywords are checked before income keywords.
const CHARGE_KEYWORDS: &[&str] = &[
    "cargo",
    "pago",
    "compra",
    "débito",
    "retirada",
    "domiciliación",
    "transferencia enviada",
    "con mastercard",
    "con visa",
    "retirada de efectivo",
];

const INCOME_KEYWORDS: &[&str] = &[
    "abono",
    "ingreso",
    "transferencia recibida",
    "devolución",
    "has recibido",
    "ingreso de efectivo",
    "bizum",
];

/// Parse a bank push-notification body into a draft transaction. The amount
/// is the only required field; the sign is not known a priori, so it follows
/// the inferred kind. Notifications carry no date, so the caller supplies
/// `now`.
pub fn parse_notification(text: &str, app_id: &str, now: NaiveDateTime) -> Result<Transaction> {
    let amount = extract_amount(text).ok_or(HuchaError::NoAmountFound)?;

    let kind = determine_kind(text);
    let concept = extract_concept(text);
    let source = source_label(app_id);

    let signed = if kind == TransactionType::Expense {
        -amount
    } else {
        amount
    };

    Ok(Transaction {
        id: new_id(),
        date: now,
        amount: signed,
        concept,
        category: UNCATEGORIZED.to_string(),
        source,
        kind,
        balance: 0.0,
        original_text: text.to_string(),
        is_manual: false,
    })
}

fn extract_amount(text: &str) -> Option<f64> {
    for pattern in AMOUNT_PATTERNS {
        let re = Regex::new(pattern).unwrap();
        if let Some(captures) = re.captures(text) {
            let raw = captures.get(1)?.as_str();
            let normalized = raw.replace('.', "").replace(',', ".");
            return normalized.parse().ok();
        }
    }
    None
}

fn determine_kind(text: &str) -> TransactionType {
    let lower = text.to_lowercase();

    if CHARGE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return TransactionType::Expense;
    }
    if INCOME_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return TransactionType::Income;
    }
    TransactionType::Unknown
}

fn source_label(app_id: &str) -> String {
    let id = app_id.to_lowercase();
    let label = if id.contains("santander") {
        "Santander"
    } else if id.contains("google") || id.contains("wallet") {
        "Google Wallet"
    } else if id.contains("bbva") {
        "BBVA"
    } else {
        "Unknown"
    };
    label.to_string()
}

fn extract_concept(text: &str) -> String {
    let lower = text.to_lowercase();
    let lines: Vec<&str> = text.split('\n').collect();

    // Wallet card payments: the merchant sits on its own line, away from
    // the amount and the card-brand wording.
    if lower.contains("con mastercard") || lower.contains("con visa") {
        for line in &lines {
            let line_lower = line.to_lowercase();
            if !line.contains('€')
                && !line.contains("EUR")
                && !line_lower.contains("mastercard")
                && !line_lower.contains("visa")
                && !line.trim().is_empty()
            {
                return truncate_chars(line.trim(), MAX_CONCEPT_LEN);
            }
        }
        return "Compra con tarjeta".to_string();
    }

    // Peer-to-peer transfers.
    if lower.contains("bizum") {
        let re = Regex::new(r"(?i)de ([A-Z\s.]+) por Pagos").unwrap();
        if let Some(captures) = re.captures(text) {
            return format!("Bizum de {}", captures[1].trim());
        }
        return "Bizum".to_string();
    }

    // ATM operations.
    if lower.contains("cajero") {
        let re = Regex::new(r"(?i)cajero (\d+\.\d+\.\d+\.\d+)").unwrap();
        if let Some(captures) = re.captures(text) {
            return format!("Cajero {}", &captures[1]);
        }
        if lower.contains("ingreso") {
            return "Ingreso en cajero".to_string();
        }
        return "Retirada en cajero".to_string();
    }

    // Generic: merchant usually follows " en "; payer follows " de " when
    // the remainder is not itself an amount.
    let amount_like = Regex::new(r"\d+[.,]\d+.*").unwrap();
    for line in &lines {
        let line_lower = line.to_lowercase();
        if let Some(pos) = line_lower.find(" en ") {
            let after = line[pos + 4..].trim();
            if !after.is_empty() {
                return truncate_chars(after, MAX_CONCEPT_LEN);
            }
        }
        if line_lower.contains(" de ") && !line.contains('€') && !line.contains("EUR") {
            if let Some(pos) = line_lower.find(" de ") {
                let after = line[pos + 4..].trim();
                if !after.is_empty() && !amount_like.is_match(after) {
                    return truncate_chars(after, MAX_CONCEPT_LEN);
                }
            }
        }
    }

    // Fall back to the second line, else the first.
    if lines.len() > 1 {
        truncate_chars(lines[1].trim(), MAX_CONCEPT_LEN)
    } else {
        truncate_chars(lines[0].trim(), MAX_CONCEPT_LEN)
    }
}
