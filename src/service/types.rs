use serde::{Deserialize, Serialize};

/// A raw book record as returned by the search service.
///
/// `subject` and `image` are optional on the wire; older servers omit them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BookHit {
    pub name: String,
    pub isbn: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub point: f64,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}
