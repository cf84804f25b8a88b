use std::path::PathBuf;
use thiserror::Error;
use wikiscraper_scanner::ScanError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Malformed word count file {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Table number {requested} out of range (found {available})")]
    Range { requested: usize, available: usize },

    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Nothing to analyze: {0}")]
    EmptyInput(String),

    #[error("No content: {0}")]
    EmptyContent(String),

    #[error("Language corpus error: {0}")]
    Corpus(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
