//! # Actions
//!
//! Everything that can happen on the search screens becomes an `Action`.
//! User types? That's `Action::TextChanged(text)`.
//! Search service answers? That's `Action::SearchCompleted { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the effects the runtime must perform (service
//! calls, persisting keywords). No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! Every request carries a `RequestTag`. A completion whose generation is
//! older than the latest request of its kind is dropped, so a slow response
//! can never overwrite the result of a newer one.

use log::{debug, warn};

use crate::core::keywords::{record_keyword, remove_keyword};
use crate::core::mapper::{to_book_detail, to_result_list};
use crate::core::state::{SearchError, SearchResult, SearchState};
use crate::service::{BookHit, ServiceError};

/// Identifies one outgoing request: its generation and the text it was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Related,
    Search,
    BookInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // User events
    TextChanged(String),
    SubmitKeyword,
    SelectSuggestion(String),
    RemoveRecentKeyword(String),
    SelectBook(String),
    ClearBook,
    DismissError,

    // Completions from the runtime
    RelatedKeywordsLoaded {
        tag: RequestTag,
        result: Result<Option<Vec<String>>, ServiceError>,
    },
    SearchCompleted {
        tag: RequestTag,
        result: Result<Option<Vec<BookHit>>, ServiceError>,
    },
    BookInfoLoaded {
        tag: RequestTag,
        result: Result<Option<BookHit>, ServiceError>,
    },
    /// A request task ended without reporting (panicked or aborted).
    TaskDropped { kind: TaskKind, generation: u64 },
    KeywordsSaveFailed(String),
}

impl Action {
    /// For completions, the request they answer.
    pub fn completion_of(&self) -> Option<(TaskKind, u64)> {
        match self {
            Action::RelatedKeywordsLoaded { tag, .. } => Some((TaskKind::Related, tag.generation)),
            Action::SearchCompleted { tag, .. } => Some((TaskKind::Search, tag.generation)),
            Action::BookInfoLoaded { tag, .. } => Some((TaskKind::BookInfo, tag.generation)),
            Action::TaskDropped { kind, generation } => Some((*kind, *generation)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchRelated(RequestTag),
    Search(RequestTag),
    FetchBookInfo(RequestTag),
    Cancel(TaskKind),
    SaveKeywords(Vec<String>),
}

/// Applies `action` to `state` and returns the effects to run, in order.
pub fn update(state: &mut SearchState, action: Action) -> Vec<Effect> {
    let mut effects = Vec::new();

    match action {
        Action::TextChanged(text) => {
            if text.trim().is_empty() {
                // Back to the recent/popular keyword view.
                state.search_keyword = text;
                clear_related(state, &mut effects);
                state.search_result = SearchResult::default();
                state.is_searched = false;
                state.search_generation += 1;
                state.is_search_loading = false;
                effects.push(Effect::Cancel(TaskKind::Search));
            } else {
                state.search_keyword = text;
                state.related_generation += 1;
                effects.push(Effect::FetchRelated(RequestTag {
                    generation: state.related_generation,
                    query: state.search_keyword.clone(),
                }));
            }
        }

        Action::SubmitKeyword => {
            if state.search_keyword.is_empty() {
                debug!("Submit ignored: empty keyword");
                return effects;
            }
            clear_related(state, &mut effects);
            record(state, &mut effects);
            issue_search(state, &mut effects);
        }

        Action::SelectSuggestion(keyword) => {
            state.search_keyword = keyword;
            clear_related(state, &mut effects);
            if state.variant.records_selected_suggestions() {
                record(state, &mut effects);
            }
            issue_search(state, &mut effects);
        }

        Action::RemoveRecentKeyword(keyword) => {
            if let Some(list) = remove_keyword(&state.recent_keyword_list, &keyword) {
                state.recent_keyword_list = list.clone();
                effects.push(Effect::SaveKeywords(list));
            }
        }

        Action::SelectBook(isbn) => {
            state.detail_generation += 1;
            state.selected_book = None;
            state.is_detail_loading = true;
            effects.push(Effect::FetchBookInfo(RequestTag {
                generation: state.detail_generation,
                query: isbn,
            }));
        }

        Action::ClearBook => {
            state.detail_generation += 1;
            state.selected_book = None;
            state.is_detail_loading = false;
            effects.push(Effect::Cancel(TaskKind::BookInfo));
        }

        Action::DismissError => {
            state.error = None;
        }

        Action::RelatedKeywordsLoaded { tag, result } => {
            if tag.generation != state.related_generation {
                debug!("Dropping stale suggestions for {:?}", tag.query);
                return effects;
            }
            match result {
                Ok(Some(keywords)) => state.related_keyword_list = keywords,
                Ok(None) => {}
                Err(e) => debug!("Suggestions for {:?} failed: {}", tag.query, e),
            }
        }

        Action::SearchCompleted { tag, result } => {
            if tag.generation != state.search_generation {
                debug!("Dropping stale search result for {:?}", tag.query);
                return effects;
            }
            match result {
                Ok(Some(hits)) => {
                    state.search_result = SearchResult {
                        searched_keyword: tag.query,
                        result_list: to_result_list(&hits),
                    };
                    state.is_searched = true;
                }
                Ok(None) => debug!("Search for {:?} returned no payload", tag.query),
                Err(e) => {
                    warn!("Search for {:?} failed: {}", tag.query, e);
                    state.error = Some(SearchError::Search {
                        keyword: tag.query,
                        message: e.to_string(),
                        retryable: e.is_retryable(),
                    });
                }
            }
            state.is_search_loading = false;
        }

        Action::BookInfoLoaded { tag, result } => {
            if tag.generation != state.detail_generation {
                debug!("Dropping stale book info for {}", tag.query);
                return effects;
            }
            match result {
                Ok(Some(hit)) => state.selected_book = Some(to_book_detail(&hit)),
                Ok(None) => debug!("Book {} not found", tag.query),
                Err(e) => {
                    warn!("Book info for {} failed: {}", tag.query, e);
                    state.error = Some(SearchError::BookInfo {
                        isbn: tag.query,
                        message: e.to_string(),
                        retryable: e.is_retryable(),
                    });
                }
            }
            state.is_detail_loading = false;
        }

        Action::TaskDropped { kind, generation } => {
            match kind {
                TaskKind::Search if generation == state.search_generation => {
                    warn!("Search task ended without a result");
                    state.is_search_loading = false;
                }
                TaskKind::BookInfo if generation == state.detail_generation => {
                    warn!("Book info task ended without a result");
                    state.is_detail_loading = false;
                }
                _ => {}
            }
        }

        Action::KeywordsSaveFailed(message) => {
            state.error = Some(SearchError::Storage(message));
        }
    }

    effects
}

/// Clears suggestions and fences off any that are still in flight.
fn clear_related(state: &mut SearchState, effects: &mut Vec<Effect>) {
    state.related_keyword_list.clear();
    state.related_generation += 1;
    effects.push(Effect::Cancel(TaskKind::Related));
}

fn record(state: &mut SearchState, effects: &mut Vec<Effect>) {
    let list = record_keyword(&state.recent_keyword_list, &state.search_keyword);
    state.recent_keyword_list = list.clone();
    effects.push(Effect::SaveKeywords(list));
}

fn issue_search(state: &mut SearchState, effects: &mut Vec<Effect>) {
    state.search_generation += 1;
    state.is_search_loading = true;
    if matches!(state.error, Some(SearchError::Search { .. })) {
        state.error = None;
    }
    effects.push(Effect::Search(RequestTag {
        generation: state.search_generation,
        query: state.search_keyword.clone(),
    }));
}
