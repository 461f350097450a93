//! # Review Flow
//!
//! The multi-step review authoring flow as an explicit scope:
//!
//! ```text
//! Onboarding ──▶ Write ──▶ Location ──▶ LocationMap ──▶ Complete
//!  (pick book)   (rating,    (choose      (pin on map)
//!                 content)    how)
//! ```
//!
//! A `ReviewFlow` is created when the user starts a review and is consumed by
//! `finish()` or `abort()`. Every step works on the same scope, passed
//! explicitly; dropping the scope cancels its in-flight book searches.

use std::fmt;
use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::core::flow::BookSearchFlow;
use crate::core::mapper::ResultItem;
use crate::core::review::ReviewLocation;
use crate::core::state::SearchVariant;
use crate::core::store::KeywordStore;
use crate::service::BookSearchService;

pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStep {
    Onboarding,
    Write,
    Location,
    LocationMap,
    Complete,
}

impl ReviewStep {
    fn next(self) -> Option<ReviewStep> {
        match self {
            ReviewStep::Onboarding => Some(ReviewStep::Write),
            ReviewStep::Write => Some(ReviewStep::Location),
            ReviewStep::Location => Some(ReviewStep::LocationMap),
            ReviewStep::LocationMap => Some(ReviewStep::Complete),
            ReviewStep::Complete => None,
        }
    }

    fn previous(self) -> Option<ReviewStep> {
        match self {
            ReviewStep::Onboarding | ReviewStep::Complete => None,
            ReviewStep::Write => Some(ReviewStep::Onboarding),
            ReviewStep::Location => Some(ReviewStep::Write),
            ReviewStep::LocationMap => Some(ReviewStep::Location),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDraft {
    pub book: Option<ResultItem>,
    pub rating: Option<f64>,
    pub content: String,
    pub location: Option<ReviewLocation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewFlowError {
    NoBookSelected,
    /// The ISBN is not among the current search results.
    UnknownBook(String),
    /// Ratings go from 0 to 5 in half steps.
    InvalidRating(f64),
    MissingRating,
    EmptyContent,
    NoLocation,
    AlreadyComplete,
    NotComplete(ReviewStep),
}

impl fmt::Display for ReviewFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewFlowError::NoBookSelected => write!(f, "pick a book first"),
            ReviewFlowError::UnknownBook(isbn) => write!(f, "book {isbn} is not in the results"),
            ReviewFlowError::InvalidRating(r) => write!(f, "invalid rating {r}"),
            ReviewFlowError::MissingRating => write!(f, "rating is required"),
            ReviewFlowError::EmptyContent => write!(f, "review text is empty"),
            ReviewFlowError::NoLocation => write!(f, "choose a location"),
            ReviewFlowError::AlreadyComplete => write!(f, "review is already complete"),
            ReviewFlowError::NotComplete(step) => write!(f, "review is still at {step:?}"),
        }
    }
}

impl std::error::Error for ReviewFlowError {}

fn valid_rating(rating: f64) -> bool {
    (0.0..=MAX_RATING).contains(&rating) && (rating * 2.0).fract() == 0.0
}

pub struct ReviewFlow {
    id: Uuid,
    step: ReviewStep,
    draft: ReviewDraft,
    book_search: BookSearchFlow,
}

impl ReviewFlow {
    pub fn begin(service: Arc<dyn BookSearchService>, store: Arc<dyn KeywordStore>) -> Self {
        let id = Uuid::new_v4();
        info!("Review flow {} started", id);
        Self {
            id,
            step: ReviewStep::Onboarding,
            draft: ReviewDraft::default(),
            book_search: BookSearchFlow::new(SearchVariant::Review, service, store),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> ReviewStep {
        self.step
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    /// The book picker shown from the onboarding step.
    pub fn book_search(&mut self) -> &mut BookSearchFlow {
        &mut self.book_search
    }

    /// Picks a book from the picker's current results.
    pub fn pick_book(&mut self, isbn: &str) -> Result<&ResultItem, ReviewFlowError> {
        let item = self
            .book_search
            .state()
            .search_result
            .result_list
            .iter()
            .find(|item| item.isbn == isbn)
            .cloned()
            .ok_or_else(|| ReviewFlowError::UnknownBook(isbn.to_string()))?;
        Ok(self.draft.book.insert(item))
    }

    pub fn set_rating(&mut self, rating: f64) -> Result<(), ReviewFlowError> {
        if !valid_rating(rating) {
            return Err(ReviewFlowError::InvalidRating(rating));
        }
        self.draft.rating = Some(rating);
        Ok(())
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    pub fn set_location(&mut self, location: ReviewLocation) {
        self.draft.location = Some(location);
    }

    /// Moves to the next step once the current one is filled in.
    pub fn advance(&mut self) -> Result<ReviewStep, ReviewFlowError> {
        match self.step {
            ReviewStep::Onboarding if self.draft.book.is_none() => {
                return Err(ReviewFlowError::NoBookSelected);
            }
            ReviewStep::Write => {
                if self.draft.rating.is_none() {
                    return Err(ReviewFlowError::MissingRating);
                }
                if self.draft.content.trim().is_empty() {
                    return Err(ReviewFlowError::EmptyContent);
                }
            }
            ReviewStep::LocationMap if self.draft.location.is_none() => {
                return Err(ReviewFlowError::NoLocation);
            }
            _ => {}
        }
        let next = self.step.next().ok_or(ReviewFlowError::AlreadyComplete)?;
        info!("Review flow {}: {:?} -> {:?}", self.id, self.step, next);
        self.step = next;
        Ok(next)
    }

    /// Steps back; a no-op on the first step and once complete.
    pub fn back(&mut self) -> ReviewStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Closes the scope and hands back the finished draft.
    pub fn finish(self) -> Result<ReviewDraft, ReviewFlowError> {
        if self.step != ReviewStep::Complete {
            return Err(ReviewFlowError::NotComplete(self.step));
        }
        info!("Review flow {} finished", self.id);
        Ok(self.draft)
    }

    /// Closes the scope without a review.
    pub fn abort(self) {
        info!("Review flow {} aborted at {:?}", self.id, self.step);
    }
}
