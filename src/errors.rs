use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IO(String),
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("workbook error: {0}")]
    Workbook(String),
    #[error("malformed coordinate '{value}': {reason}")]
    MalformedCoordinate { value: String, reason: String },
    #[error("row {row}, column '{column}': {reason}")]
    MalformedCell {
        row: usize,
        column: &'static str,
        reason: String,
    },
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("csv error: {0}")]
    Csv(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::IO(format!("{}", e)) }
}
