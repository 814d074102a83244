use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuchaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Input is empty")]
    EmptyInput,

    #[error("No header row with date, concept and amount columns")]
    NoHeaderFound,

    #[error("No amount found in notification text")]
    NoAmountFound,

    #[error("No date-led transaction lines found in statement text")]
    NoStructuralAnchor,

    #[error("Unparsable amount: '{0}'")]
    AmountFormat(String),

    #[error("Unparsable date: '{0}'")]
    DateFormat(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HuchaError>;
