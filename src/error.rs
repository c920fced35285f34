use thiserror::Error;

/// Failures that stop a single fetch, write or config load.
///
/// A missing section is not an error: extractors return empty strings or
/// the documented markers for that.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("document has no content")]
    EmptyDocument,
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not parse config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
