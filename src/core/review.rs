//! # Reviews
//!
//! Review entries for a book and the user-selectable orderings over them.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Where a review was written.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReviewLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub id: String,
    pub isbn: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub content: String,
    pub rating: f64,
    pub datetime: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<ReviewLocation>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewOrder {
    /// Newest first
    #[default]
    Recent,
    /// Oldest first
    Past,
    /// Highest rating first, newest first among equals
    HighRating,
    /// Lowest rating first, newest first among equals
    LowRating,
}

fn newest_first(a: &ReviewItem, b: &ReviewItem) -> Ordering {
    b.datetime.cmp(&a.datetime)
}

/// Returns the reviews sorted by `order`. The sort is stable, so entries
/// that compare equal keep their incoming order.
pub fn reorder(items: &[ReviewItem], order: ReviewOrder) -> Vec<ReviewItem> {
    let mut sorted = items.to_vec();
    match order {
        ReviewOrder::Recent => sorted.sort_by(newest_first),
        ReviewOrder::Past => sorted.sort_by(|a, b| a.datetime.cmp(&b.datetime)),
        ReviewOrder::HighRating => {
            sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| newest_first(a, b)))
        }
        ReviewOrder::LowRating => {
            sorted.sort_by(|a, b| a.rating.total_cmp(&b.rating).then_with(|| newest_first(a, b)))
        }
    }
    sorted
}
