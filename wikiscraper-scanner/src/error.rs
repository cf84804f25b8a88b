use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to fetch article ({status}): {url}")]
    FetchStatus { url: String, status: u16 },

    #[error("Failed to fetch article: {url}: {source}")]
    FetchTransport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Local HTML file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Page sink failed: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ScanError {
    /// Status code of the last response, when the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ScanError::FetchStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
