//! # Search State
//!
//! Everything the search and book-detail screens render, in one record.
//!
//! ```text
//! SearchState
//! ├── variant: SearchVariant            // which flow owns this state
//! ├── search_keyword: String            // text in the search box
//! ├── related_keyword_list: Vec<String> // live suggestions while typing
//! ├── search_result: SearchResult       // keyword + the rows it produced
//! ├── recent_keyword_list: Vec<String>  // ≤10, most recent first, unique
//! ├── is_search_loading: bool
//! ├── is_searched: bool
//! ├── selected_book: Option<BookDetail> // detail screen
//! ├── is_detail_loading: bool
//! └── error: Option<SearchError>        // last failure, for a retry affordance
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::fmt;

use crate::core::mapper::{BookDetail, ResultItem};

/// Which screen flow a search state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchVariant {
    /// Standalone book search leading to the detail screen.
    #[default]
    BookInfo,
    /// Book picker inside the review authoring flow.
    Review,
}

impl SearchVariant {
    /// Whether picking a suggestion adds it to the recent keywords.
    ///
    /// The review picker deliberately leaves history untouched.
    pub fn records_selected_suggestions(self) -> bool {
        matches!(self, SearchVariant::BookInfo)
    }
}

/// Search rows paired with the keyword that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub searched_keyword: String,
    pub result_list: Vec<ResultItem>,
}

/// A failure worth showing to the user.
///
/// `retryable` is set when the service reported a transient failure, so a UI
/// can offer to run the same request again.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    Search { keyword: String, message: String, retryable: bool },
    BookInfo { isbn: String, message: String, retryable: bool },
    Storage(String),
}

impl SearchError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Search { retryable, .. } | SearchError::BookInfo { retryable, .. } => {
                *retryable
            }
            SearchError::Storage(_) => false,
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Search { keyword, message, .. } => {
                write!(f, "search for {keyword:?} failed: {message}")
            }
            SearchError::BookInfo { isbn, message, .. } => {
                write!(f, "loading book {isbn} failed: {message}")
            }
            SearchError::Storage(msg) => write!(f, "saving recent keywords failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub variant: SearchVariant,
    pub search_keyword: String,
    pub related_keyword_list: Vec<String>,
    pub search_result: SearchResult,
    pub recent_keyword_list: Vec<String>,
    pub is_search_loading: bool,
    pub is_searched: bool,
    pub selected_book: Option<BookDetail>,
    pub is_detail_loading: bool,
    pub error: Option<SearchError>,
    // Latest request issued per kind; completions carrying an older value are stale.
    pub(crate) related_generation: u64,
    pub(crate) search_generation: u64,
    pub(crate) detail_generation: u64,
}

impl SearchState {
    pub fn new(variant: SearchVariant, recent_keyword_list: Vec<String>) -> Self {
        Self {
            variant,
            recent_keyword_list,
            ..Default::default()
        }
    }
}
