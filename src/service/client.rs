use std::fmt;

use async_trait::async_trait;

use super::types::BookHit;

/// Errors that can occur while talking to the search service.
///
/// Every call surfaces exactly one of: success with data, success with
/// `None`, a structured error body (`Api`), or a transport failure
/// (`Network`).
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Service misconfigured (bad base URL). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// The server answered with a non-success status and an error body.
    Api { status: u16, message: String },
    /// The response body did not match the expected shape.
    Parse(String),
}

impl ServiceError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Network(_) => true,
            ServiceError::Api { status, .. } => *status >= 500 || *status == 429,
            ServiceError::Config(_) | ServiceError::Parse(_) => false,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Config(msg) => write!(f, "config error: {msg}"),
            ServiceError::Network(msg) => write!(f, "network error: {msg}"),
            ServiceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ServiceError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

#[async_trait]
pub trait BookSearchService: Send + Sync {
    /// Returns the name of the service (used in log lines).
    fn name(&self) -> &str;

    /// Searches books by keyword. `Ok(None)` means the server sent no payload.
    async fn search_books(&self, keyword: &str) -> Result<Option<Vec<BookHit>>, ServiceError>;

    /// Fetches a single book by ISBN.
    async fn book_info(&self, isbn: &str) -> Result<Option<BookHit>, ServiceError>;

    /// Suggestions shown while the user is still typing.
    ///
    /// Defaults to the titles of a keyword search.
    async fn related_keywords(&self, text: &str) -> Result<Option<Vec<String>>, ServiceError> {
        let hits = self.search_books(text).await?;
        Ok(hits.map(|hits| hits.into_iter().map(|hit| hit.name).collect()))
    }
}
