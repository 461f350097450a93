use ibooku::service::{BookSearchService, HttpBookService, ServiceError};
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn dune_json() -> serde_json::Value {
    serde_json::json!({
        "name": "Dune",
        "isbn": "9780441013593",
        "author": "Frank Herbert",
        "publisher": "Ace",
        "content": "Desert planet.",
        "point": 4.5,
        "subject": "Fiction",
        "image": "https://img.example/dune.jpg"
    })
}

fn service_for(server: &MockServer) -> HttpBookService {
    HttpBookService::new(server.uri(), None).unwrap()
}

// ============================================================================
// search_books
// ============================================================================

#[tokio::test]
async fn test_search_returns_hits() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/search"))
        .and(query_param("keyword", "dune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([dune_json()])))
        .mount(&mock_server)
        .await;

    let hits = assert_ok!(service_for(&mock_server).search_books("dune").await).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Dune");
    assert_eq!(hits[0].point, 4.5);
    assert_eq!(hits[0].subject.as_deref(), Some("Fiction"));
}

#[tokio::test]
async fn test_search_null_body_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let hits = assert_ok!(service_for(&mock_server).search_books("nothing").await);
    assert!(hits.is_none());
}

#[tokio::test]
async fn test_search_empty_body_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/search"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let hits = assert_ok!(service_for(&mock_server).search_books("nothing").await);
    assert!(hits.is_none());
}

#[tokio::test]
async fn test_search_api_error_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(service_for(&mock_server).search_books("dune").await);
    assert_eq!(
        err,
        ServiceError::Api {
            status: 500,
            message: "database unavailable".to_string()
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_search_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"unexpected\": true}"))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).search_books("dune").await;
    assert!(matches!(result, Err(ServiceError::Parse(_))));
}

#[tokio::test]
async fn test_network_error_when_connection_refused() {
    // Nothing listens on port 1.
    let service = HttpBookService::new("http://127.0.0.1:1".to_string(), None).unwrap();
    let result = service.search_books("dune").await;
    assert!(matches!(result, Err(ServiceError::Network(_))));
}

#[tokio::test]
async fn test_api_key_sent_as_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/search"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = HttpBookService::new(mock_server.uri(), Some("secret".to_string())).unwrap();
    let hits = assert_ok!(service.search_books("dune").await).unwrap();
    assert!(hits.is_empty());
}

// ============================================================================
// book_info / related_keywords
// ============================================================================

#[tokio::test]
async fn test_book_info_returns_hit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/9780441013593"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dune_json()))
        .mount(&mock_server)
        .await;

    let hit = assert_ok!(service_for(&mock_server).book_info("9780441013593").await).unwrap();
    assert_eq!(hit.author, "Frank Herbert");
    assert_eq!(hit.content, "Desert planet.");
}

#[tokio::test]
async fn test_book_info_not_found_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/000"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such book"))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).book_info("000").await;
    assert!(matches!(result, Err(ServiceError::Api { status: 404, .. })));
}

#[tokio::test]
async fn test_book_info_isbn_is_percent_encoded() {
    let mock_server = MockServer::start().await;

    let mut other = dune_json();
    other["author"] = serde_json::json!("Someone Else");
    Mock::given(method("GET"))
        .and(path("/books/978"))
        .respond_with(ResponseTemplate::new(200).set_body_json(other))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/978%231"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dune_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hit = assert_ok!(service_for(&mock_server).book_info("978#1").await).unwrap();
    assert_eq!(hit.author, "Frank Herbert");
}

#[tokio::test]
async fn test_related_keywords_are_titles() {
    let mock_server = MockServer::start().await;

    let mut messiah = dune_json();
    messiah["name"] = serde_json::json!("Dune Messiah");

    Mock::given(method("GET"))
        .and(path("/books/search"))
        .and(query_param("keyword", "du"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([dune_json(), messiah])),
        )
        .mount(&mock_server)
        .await;

    let keywords = assert_ok!(service_for(&mock_server).related_keywords("du").await).unwrap();
    assert_eq!(keywords, vec!["Dune", "Dune Messiah"]);
}
