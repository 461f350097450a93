//! Maps raw search-service records into what the screens display.

use serde::{Deserialize, Serialize};

use crate::service::BookHit;

/// A single row in the search result list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub isbn: String,
    pub class_name: Option<String>,
    pub image_url: Option<String>,
    pub rating: f64,
}

/// The book shown on the detail screen.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub publisher: String,
    pub content: String,
    pub rating: f64,
}

pub fn to_result_item(hit: &BookHit) -> ResultItem {
    ResultItem {
        title: hit.name.clone(),
        author: hit.author.clone(),
        publisher: hit.publisher.clone(),
        isbn: hit.isbn.clone(),
        class_name: hit.subject.clone(),
        image_url: hit.image.clone(),
        rating: hit.point,
    }
}

pub fn to_result_list(hits: &[BookHit]) -> Vec<ResultItem> {
    hits.iter().map(to_result_item).collect()
}

pub fn to_book_detail(hit: &BookHit) -> BookDetail {
    BookDetail {
        title: hit.name.clone(),
        isbn: hit.isbn.clone(),
        author: hit.author.clone(),
        publisher: hit.publisher.clone(),
        content: hit.content.clone(),
        rating: hit.point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit() -> BookHit {
        BookHit {
            name: "Dune".into(),
            isbn: "9780441013593".into(),
            author: "Frank Herbert".into(),
            publisher: "Ace".into(),
            content: "Desert planet.".into(),
            point: 4.5,
            subject: Some("Fiction".into()),
            image: Some("https://img.example/dune.jpg".into()),
        }
    }

    #[test]
    fn test_result_item_fields() {
        let item = to_result_item(&hit());
        assert_eq!(item.title, "Dune");
        assert_eq!(item.author, "Frank Herbert");
        assert_eq!(item.publisher, "Ace");
        assert_eq!(item.isbn, "9780441013593");
        assert_eq!(item.class_name.as_deref(), Some("Fiction"));
        assert_eq!(item.image_url.as_deref(), Some("https://img.example/dune.jpg"));
        assert_eq!(item.rating, 4.5);
    }

    #[test]
    fn test_result_list_preserves_order() {
        let mut second = hit();
        second.name = "Children of Dune".into();
        let items = to_result_list(&[hit(), second]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Dune");
        assert_eq!(items[1].title, "Children of Dune");
    }

    #[test]
    fn test_book_detail_keeps_content() {
        let detail = to_book_detail(&hit());
        assert_eq!(detail.content, "Desert planet.");
        assert_eq!(detail.rating, 4.5);
    }
}
