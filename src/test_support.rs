//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::store::{KeywordStore, StoreError};
use crate::service::{BookHit, BookSearchService, ServiceError};

/// A book hit with just enough filled in to tell rows apart.
pub fn book_hit(name: &str, isbn: &str) -> BookHit {
    BookHit {
        name: name.to_string(),
        isbn: isbn.to_string(),
        author: "Author".to_string(),
        publisher: "Publisher".to_string(),
        content: String::new(),
        point: 4.0,
        subject: None,
        image: None,
    }
}

/// Answers from canned tables; unknown keywords and ISBNs get `Ok(None)`.
#[derive(Default)]
pub struct StubSearchService {
    searches: HashMap<String, Result<Option<Vec<BookHit>>, ServiceError>>,
    books: HashMap<String, BookHit>,
}

impl StubSearchService {
    pub fn with_search(
        mut self,
        keyword: &str,
        result: Result<Option<Vec<BookHit>>, ServiceError>,
    ) -> Self {
        self.searches.insert(keyword.to_string(), result);
        self
    }

    pub fn with_book(mut self, hit: BookHit) -> Self {
        self.books.insert(hit.isbn.clone(), hit);
        self
    }
}

#[async_trait]
impl BookSearchService for StubSearchService {
    fn name(&self) -> &str {
        "stub"
    }

    async fn search_books(&self, keyword: &str) -> Result<Option<Vec<BookHit>>, ServiceError> {
        self.searches.get(keyword).cloned().unwrap_or(Ok(None))
    }

    async fn book_info(&self, isbn: &str) -> Result<Option<BookHit>, ServiceError> {
        Ok(self.books.get(isbn).cloned())
    }
}

/// A keyword store whose disk is always full.
pub struct FailingKeywordStore;

impl KeywordStore for FailingKeywordStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }

    fn save(&self, _keywords: &[String]) -> Result<(), StoreError> {
        Err(StoreError::Io(io::Error::other("no space left on device")))
    }
}

/// Sends on its channel when dropped.
struct DropSignal(mpsc::UnboundedSender<()>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        let _ = self.0.send(());
    }
}

/// A service whose searches never answer. Reports on `started` once a search
/// is running and on `dropped` when that search's future is torn down.
pub struct HangingSearchService {
    started: mpsc::UnboundedSender<()>,
    dropped: mpsc::UnboundedSender<()>,
}

impl HangingSearchService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<()>, mpsc::UnboundedReceiver<()>) {
        let (started, started_rx) = mpsc::unbounded_channel();
        let (dropped, dropped_rx) = mpsc::unbounded_channel();
        (Self { started, dropped }, started_rx, dropped_rx)
    }
}

#[async_trait]
impl BookSearchService for HangingSearchService {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn search_books(&self, _keyword: &str) -> Result<Option<Vec<BookHit>>, ServiceError> {
        let _signal = DropSignal(self.dropped.clone());
        let _ = self.started.send(());
        std::future::pending().await
    }

    async fn book_info(&self, _isbn: &str) -> Result<Option<BookHit>, ServiceError> {
        Ok(None)
    }
}
