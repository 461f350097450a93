//! HTTP implementation of the search service.
//!
//! Endpoints (relative to the configured base URL):
//! - `GET /books/search?keyword=<kw>` → JSON array of hits, or `null`
//! - `GET /books/<isbn>` → a single hit, or `null`
//!
//! Non-2xx responses become `ServiceError::Api` carrying the error body.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::client::{BookSearchService, ServiceError};
use super::types::BookHit;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Book search API client backed by `reqwest`.
pub struct HttpBookService {
    base_url: Url,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpBookService {
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self, ServiceError> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let parsed = Url::parse(&base_url)
            .map_err(|e| ServiceError::Config(format!("invalid base URL {base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ServiceError::Config(format!("invalid base URL: {base_url}")));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        Ok(Self {
            base_url: parsed,
            api_key,
            client,
        })
    }

    /// Appends `segments` to the base URL, percent-encoding each one so an
    /// ISBN containing `/`, `?` or `#` stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Config(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues a GET and decodes a possibly-null JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, ServiceError> {
        let mut request = self.client.get(url.clone()).query(query);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        debug!("{} response status: {}", url, response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("server-response error: {} - {}", status, err_body);
            return Err(ServiceError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<Option<T>>(&body).map_err(|e| {
            warn!("server-response parse failure: {}", e);
            ServiceError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl BookSearchService for HttpBookService {
    fn name(&self) -> &str {
        "http"
    }

    async fn search_books(&self, keyword: &str) -> Result<Option<Vec<BookHit>>, ServiceError> {
        info!("Book search request: keyword={:?}", keyword);
        let url = self.endpoint(&["books", "search"])?;
        let hits = self
            .get_json::<Vec<BookHit>>(url, &[("keyword", keyword)])
            .await?;
        debug!(
            "Book search for {:?} returned {} hits",
            keyword,
            hits.as_ref().map_or(0, Vec::len)
        );
        Ok(hits)
    }

    async fn book_info(&self, isbn: &str) -> Result<Option<BookHit>, ServiceError> {
        info!("Book info request: isbn={}", isbn);
        let url = self.endpoint(&["books", isbn])?;
        self.get_json::<BookHit>(url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_base_url() {
        let result = HttpBookService::new("ftp://books.example".to_string(), None);
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }

    #[test]
    fn test_trailing_slash_does_not_double() {
        let service = HttpBookService::new("http://localhost:8080/api/".to_string(), None).unwrap();
        let url = service.endpoint(&["books", "search"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/books/search");
    }

    #[test]
    fn test_isbn_stays_one_segment() {
        let service = HttpBookService::new("http://localhost:8080".to_string(), None).unwrap();
        let url = service.endpoint(&["books", "978#1?x/y"]).unwrap();
        assert_eq!(url.path(), "/books/978%231%3Fx%2Fy");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }
}
