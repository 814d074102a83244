use std::path::Path;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::{HuchaError, Result};
use crate::models::{new_id, Transaction, TransactionType, UNCATEGORIZED};
#[cfg(feature = "xlsx")]
use crate::normalize::excel_serial_to_datetime;
use crate::normalize::{parse_amount, parse_date, parse_spanish_date, truncate_chars};

/// Concepts are bounded to this many chars regardless of source.
const MAX_CONCEPT_LEN: usize = 50;

// ---------------------------------------------------------------------------
// Source formats — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceFormat {
    Csv,
    #[cfg(feature = "xlsx")]
    Xlsx,
    Statement,
    #[cfg(feature = "pdf")]
    Pdf,
}

const ALL_FORMATS: &[SourceFormat] = &[
    SourceFormat::Csv,
    #[cfg(feature = "xlsx")]
    SourceFormat::Xlsx,
    SourceFormat::Statement,
    #[cfg(feature = "pdf")]
    SourceFormat::Pdf,
];

impl SourceFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            #[cfg(feature = "xlsx")]
            Self::Xlsx => "xlsx",
            Self::Statement => "statement",
            #[cfg(feature = "pdf")]
            Self::Pdf => "pdf",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV export",
            #[cfg(feature = "xlsx")]
            Self::Xlsx => "Spreadsheet export",
            Self::Statement => "Statement text",
            #[cfg(feature = "pdf")]
            Self::Pdf => "PDF statement",
        }
    }

    pub fn from_key(key: &str) -> Option<SourceFormat> {
        ALL_FORMATS.iter().find(|f| f.key() == key).copied()
    }

    /// Guess the format from the file extension.
    pub fn sniff(path: &Path) -> Option<SourceFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            #[cfg(feature = "xlsx")]
            "xlsx" | "xls" => Some(Self::Xlsx),
            "txt" => Some(Self::Statement),
            #[cfg(feature = "pdf")]
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn parse(&self, path: &Path) -> Result<Vec<Transaction>> {
        match self {
            Self::Csv => parse_csv(&std::fs::read_to_string(path)?),
            #[cfg(feature = "xlsx")]
            Self::Xlsx => parse_xlsx(path),
            Self::Statement => parse_statement(&std::fs::read_to_string(path)?),
            #[cfg(feature = "pdf")]
            Self::Pdf => parse_pdf(path),
        }
    }
}

// ---------------------------------------------------------------------------
// Tabular parsing — shared by CSV and spreadsheet input
// ---------------------------------------------------------------------------

/// Cell content as a tagged variant; row parsing dispatches on the tag
/// instead of sniffing strings twice.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Numeric(f64),
    Text(String),
    Date(NaiveDateTime),
    Empty,
}

impl CellValue {
    fn from_text(raw: &str) -> CellValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }
}

#[cfg(feature = "xlsx")]
fn cell_from_calamine(data: &calamine::Data) -> CellValue {
    use calamine::Data;
    match data {
        Data::Empty | Data::Bool(_) | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Float(f) => CellValue::Numeric(*f),
        Data::Int(i) => CellValue::Numeric(*i as f64),
        Data::DateTime(dt) => CellValue::Date(excel_serial_to_datetime(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_text(s),
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    date: usize,
    concept: usize,
    amount: usize,
    balance: Option<usize>,
    kind: Option<usize>,
    category: Option<usize>,
}

/// Try to read a row as the header. Token checks are ordered per cell so
/// "Fecha operación" lands on the date column, not on "operación"; a later
/// column may take over a role from an earlier one.
fn map_columns(cells: &[CellValue]) -> Option<ColumnMap> {
    let mut date = None;
    let mut concept = None;
    let mut amount = None;
    let mut balance = None;
    let mut kind = None;
    let mut category = None;

    for (index, cell) in cells.iter().enumerate() {
        let CellValue::Text(text) = cell else { continue };
        let header = text.to_lowercase();

        if header.contains("fecha") {
            date = Some(index);
        } else if header.contains("concepto")
            || header.contains("descripcion")
            || header.contains("descripción")
            || header.contains("operación")
        {
            concept = Some(index);
        } else if header.contains("importe")
            || header.contains("cantidad")
            || header.contains("monto")
        {
            amount = Some(index);
        } else if header.contains("saldo") {
            balance = Some(index);
        } else if header.contains("tipo") {
            kind = Some(index);
        } else if header.contains("categoria") || header.contains("categoría") {
            category = Some(index);
        }
    }

    Some(ColumnMap {
        date: date?,
        concept: concept?,
        amount: amount?,
        balance,
        kind,
        category,
    })
}

/// One data row to a draft transaction. Any unusable required cell skips
/// the row.
fn row_to_transaction(cells: &[CellValue], map: &ColumnMap, source: &str) -> Option<Transaction> {
    let date = match cells.get(map.date)? {
        CellValue::Date(d) => *d,
        CellValue::Text(s) => parse_date(s).ok()?,
        _ => return None,
    };

    let concept = match cells.get(map.concept)? {
        CellValue::Text(s) => s.clone(),
        _ => return None,
    };

    let amount = match cells.get(map.amount)? {
        CellValue::Numeric(n) => *n,
        CellValue::Text(s) => parse_amount(s).ok()?,
        _ => return None,
    };

    let balance = map
        .balance
        .and_then(|i| cells.get(i))
        .map(|cell| match cell {
            CellValue::Numeric(n) => *n,
            CellValue::Text(s) => parse_amount(s).unwrap_or(0.0),
            _ => 0.0,
        })
        .unwrap_or(0.0);

    let kind = if amount < 0.0 {
        TransactionType::Expense
    } else {
        TransactionType::Income
    };

    Some(Transaction {
        id: new_id(),
        date,
        amount,
        concept: concept.clone(),
        category: UNCATEGORIZED.to_string(),
        source: source.to_string(),
        kind,
        balance,
        original_text: format!("{source}: {concept}"),
        is_manual: false,
    })
}

fn parse_tabular_rows(rows: &[Vec<CellValue>], source: &str) -> Result<Vec<Transaction>> {
    if rows.is_empty() {
        return Err(HuchaError::EmptyInput);
    }

    let Some((header_index, map)) = rows
        .iter()
        .enumerate()
        .find_map(|(i, row)| map_columns(row).map(|m| (i, m)))
    else {
        return Err(HuchaError::NoHeaderFound);
    };

    let mut transactions = Vec::new();
    for row in &rows[header_index + 1..] {
        if let Some(txn) = row_to_transaction(row, &map, source) {
            transactions.push(txn);
        }
    }
    Ok(transactions)
}

pub fn parse_csv(text: &str) -> Result<Vec<Transaction>> {
    if text.trim().is_empty() {
        return Err(HuchaError::EmptyInput);
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for result in rdr.records() {
        let Ok(record) = result else { continue };
        rows.push(record.iter().map(CellValue::from_text).collect());
    }
    parse_tabular_rows(&rows, "CSV")
}

#[cfg(feature = "xlsx")]
pub fn parse_xlsx(path: &Path) -> Result<Vec<Transaction>> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| HuchaError::Other(format!("Failed to open spreadsheet: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(HuchaError::EmptyInput)?
        .map_err(|e| HuchaError::Other(format!("Failed to read sheet: {e}")))?;

    let rows: Vec<Vec<CellValue>> = range
        .rows()
        .map(|row| row.iter().map(cell_from_calamine).collect())
        .collect();
    parse_tabular_rows(&rows, "Excel")
}

// ---------------------------------------------------------------------------
// Statement-text parsing (Santander PDF layout)
// ---------------------------------------------------------------------------

/// Parse text extracted from a PDF account statement. A transaction anchors
/// at a "29 ago 2025 ..." line carrying an amount+balance pair; the
/// operation description follows on a later line.
pub fn parse_statement(text: &str) -> Result<Vec<Transaction>> {
    if text.trim().is_empty() {
        return Err(HuchaError::EmptyInput);
    }

    let anchor = Regex::new(r"^\d{1,2}\s+\w{3}\s+\d{4}").unwrap();
    let amount_pair =
        Regex::new(r"(-?\d+(?:[.,]\d+)*,\d{2})€\s+(-?\d+(?:[.,]\d+)*,\d{2})€").unwrap();

    let lines: Vec<&str> = text.lines().collect();
    let mut transactions = Vec::new();
    let mut found_anchor = false;

    for (index, raw_line) in lines.iter().enumerate() {
        let line = raw_line.trim();
        if !anchor.is_match(line) {
            continue;
        }
        found_anchor = true;
        if let Some(txn) = parse_statement_entry(line, &lines, index, &anchor, &amount_pair) {
            transactions.push(txn);
        }
    }

    if !found_anchor {
        return Err(HuchaError::NoStructuralAnchor);
    }
    Ok(transactions)
}

fn parse_statement_entry(
    line: &str,
    lines: &[&str],
    index: usize,
    anchor: &Regex,
    amount_pair: &Regex,
) -> Option<Transaction> {
    // Date sits in the first ~15 chars of the anchor line.
    let date_part = truncate_chars(line, 15);
    let date = parse_spanish_date(date_part.trim())?;

    // The last amount+balance pair on the line wins; some layouts repeat
    // the pattern earlier in the line.
    let captures = amount_pair.captures_iter(line).last()?;
    let amount = parse_amount(captures.get(1)?.as_str()).ok()?;
    let balance = parse_amount(captures.get(2)?.as_str()).ok()?;

    // Operation description: next line that is not a value-date annotation,
    // not blank and not itself a date anchor.
    let mut operation_line = None;
    for next in &lines[index + 1..] {
        let next = next.trim();
        if next.starts_with("F. valor:") {
            continue;
        }
        if !next.is_empty() && !anchor.is_match(next) {
            operation_line = Some(next);
            break;
        }
    }
    let operation_line = operation_line?;

    let kind = if amount < 0.0 {
        TransactionType::Expense
    } else {
        TransactionType::Income
    };

    Some(Transaction {
        id: new_id(),
        date,
        amount,
        concept: clean_statement_concept(operation_line),
        category: UNCATEGORIZED.to_string(),
        source: "Santander".to_string(),
        kind,
        balance,
        original_text: format!("{line}\n{operation_line}"),
        is_manual: false,
    })
}

/// Strip the boilerplate statements append to operation descriptions (card
/// numbers, receipt numbers, mandate references), then bound the length.
fn clean_statement_concept(operation_line: &str) -> String {
    const STRIP_PATTERNS: &[&str] = &[
        r", Tarjeta \d+.*",
        r", Comision \d+,\d+",
        r"Tarj\. :\*\d+",
        r"Nº Recibo \d+.*",
        r"Ref\. Mandato \d+.*",
    ];

    let mut concept = operation_line.trim().to_string();
    for pattern in STRIP_PATTERNS {
        let re = Regex::new(pattern).unwrap();
        concept = re.replace_all(&concept, "").trim().to_string();
    }
    truncate_chars(&concept, MAX_CONCEPT_LEN)
}

#[cfg(feature = "pdf")]
pub fn parse_pdf(path: &Path) -> Result<Vec<Transaction>> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| HuchaError::Other(format!("Failed to extract PDF text: {e}")))?;
    parse_statement(&text)
}
