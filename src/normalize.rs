use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{HuchaError, Result};

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Parse an amount written in Spanish bank notation: dot as thousands
/// separator, comma as decimal separator, optional currency mark.
/// "1.234,56 €" -> 1234.56
pub fn parse_amount(raw: &str) -> Result<f64> {
    let cleaned = raw
        .replace('€', "")
        .replace("EUR", "")
        .replace(' ', "")
        .replace('.', "")
        .replace(',', ".");
    let cleaned = cleaned.trim();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(HuchaError::AmountFormat(raw.to_string()));
    }
    let value: f64 = cleaned
        .parse()
        .map_err(|_| HuchaError::AmountFormat(raw.to_string()))?;
    if !value.is_finite() {
        return Err(HuchaError::AmountFormat(raw.to_string()));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

// Tried in order; the unambiguous day-first variants come before the
// catch-alls so "01/03/2024" is never read month-first.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d", "%d-%m-%Y"];

const DATETIME_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S"];

/// Parse a date string against the known bank-export formats, including
/// Spanish abbreviated month names ("29 ago 2025").
pub fn parse_date(raw: &str) -> Result<NaiveDateTime> {
    let raw_trimmed = raw.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw_trimmed, format) {
            return Ok(date.and_hms_opt(0, 0, 0).unwrap());
        }
    }
    if let Some(date) = parse_spanish_date(raw_trimmed) {
        return Ok(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw_trimmed, format) {
            return Ok(dt);
        }
    }
    Err(HuchaError::DateFormat(raw.to_string()))
}

/// "29 ago 2025" -> 2025-08-29. Month matching is on the first three letters,
/// so "sept" and full month names resolve too.
pub fn parse_spanish_date(raw: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }
    let day: u32 = parts[0].parse().ok()?;
    let month = spanish_month(parts[1])?;
    let year: i32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn spanish_month(token: &str) -> Option<u32> {
    let lower = token.to_lowercase();
    let abbrev: String = lower.chars().filter(|c| c.is_alphabetic()).take(3).collect();
    match abbrev.as_str() {
        "ene" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "abr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "ago" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dic" => Some(12),
        _ => None,
    }
}

/// Excel serial date to a datetime. Epoch is 1899-12-30, accounting for the
/// 1900 leap year bug.
#[cfg(any(feature = "xlsx", test))]
pub fn excel_serial_to_datetime(serial: f64) -> NaiveDateTime {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let days = serial.floor();
    let secs = ((serial - days) * 86_400.0).round() as i64;
    base + chrono::Duration::days(days as i64) + chrono::Duration::seconds(secs)
}

// ---------------------------------------------------------------------------
// Concepts
// ---------------------------------------------------------------------------

/// Canonicalize a free-text concept for rule matching: digit runs are removed
/// (concepts often differ only by reference numbers), whitespace runs
/// collapse to single spaces, ends trimmed. Digits go first so the collapse
/// also swallows the gap they leave, which keeps the function idempotent.
pub fn normalize_concept(concept: &str) -> String {
    let without_digits: String = concept.chars().filter(|c| !c.is_ascii_digit()).collect();
    without_digits.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Char-boundary-safe prefix; byte slicing would panic inside multibyte
/// characters, which Spanish concepts are full of.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_spanish_locale() {
        assert_eq!(parse_amount("1.234,56 €").unwrap(), 1234.56);
        assert_eq!(parse_amount("-45,20").unwrap(), -45.20);
        assert_eq!(parse_amount("12,34EUR").unwrap(), 12.34);
        assert_eq!(parse_amount("€ 5,00").unwrap(), 5.0);
        assert_eq!(parse_amount("0,00").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_amount_thousands_groups() {
        assert_eq!(parse_amount("1.234.567,89").unwrap(), 1234567.89);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(matches!(
            parse_amount("sin importe"),
            Err(HuchaError::AmountFormat(_))
        ));
        assert!(matches!(parse_amount(""), Err(HuchaError::AmountFormat(_))));
        assert!(matches!(
            parse_amount("1,2,3"),
            Err(HuchaError::AmountFormat(_))
        ));
    }

    #[test]
    fn test_parse_date_formats() {
        let d = parse_date("01/03/2024").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let d = parse_date("2024-03-01").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let d = parse_date("01-03-2024").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let d = parse_date("05/07/24").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2024, 7, 5).unwrap());
    }

    #[test]
    fn test_parse_date_day_first() {
        // 01/03 is the 1st of March, never January 3rd.
        let d = parse_date("01/03/2024").unwrap();
        assert_eq!(d.date().format("%Y-%m-%d").to_string(), "2024-03-01");
    }

    #[test]
    fn test_parse_date_with_time() {
        let d = parse_date("15/06/2024 13:45:10").unwrap();
        assert_eq!(d.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-06-15 13:45:10");
    }

    #[test]
    fn test_parse_date_spanish_months() {
        let d = parse_date("29 ago 2025").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2025, 8, 29).unwrap());
        let d = parse_date("1 sept 2024").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        let d = parse_date("15 dic. 2023").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_invalid() {
        assert!(parse_date("30 feb 2024").is_err());
        assert!(parse_date("no es fecha").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_excel_serial_to_datetime() {
        let d = excel_serial_to_datetime(45667.0);
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
    }

    #[test]
    fn test_normalize_strips_reference_numbers() {
        assert_eq!(
            normalize_concept("PAGO 12345 MERCADONA"),
            "PAGO MERCADONA"
        );
        assert_eq!(normalize_concept("  COMPRA   EN    TIENDA  "), "COMPRA EN TIENDA");
        assert_eq!(normalize_concept("RECIBO 2024/03"), "RECIBO /");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "PAGO 12345 MERCADONA",
            "  TARJ. :*1234  COMPRA ",
            "BIZUM DE JUAN 99",
            "",
            "   ",
            "REF 1 2 3 FIN",
        ];
        for s in samples {
            let once = normalize_concept(s);
            assert_eq!(normalize_concept(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("DOMICILIACIÓN", 10), "DOMICILIAC");
        assert_eq!(truncate_chars("añó", 2), "añ");
        assert_eq!(truncate_chars("corto", 50), "corto");
    }
}
