//! # Search Service
//!
//! The remote book-search API, seen through a port trait so the state
//! machine never touches HTTP directly. `HttpBookService` is the real
//! implementation; tests plug in canned services.

pub mod client;
pub mod http;
pub mod types;

pub use client::{BookSearchService, ServiceError};
pub use http::HttpBookService;
pub use types::BookHit;
