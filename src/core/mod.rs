//! # Core Application Logic
//!
//! This module contains ibooku's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • SearchState          │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • BookSearchFlow       │
//!                    │    (single writer)      │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    CLI     │      │  Search    │      │  Keyword   │
//!     │ (main.rs)  │      │  Service   │      │   Store    │
//!     │            │      │  (HTTP)    │      │  (prefs)   │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `SearchState`, everything the search screens render
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`flow`]: `BookSearchFlow`, the runtime that owns a state and runs effects
//! - [`keywords`]: the bounded recent-keyword list
//! - [`store`]: persisting recent keywords
//! - [`mapper`]: raw service records → display items
//! - [`review`]: review entries and their orderings
//! - [`review_flow`]: the review authoring flow scope
//! - [`config`]: settings and their override hierarchy

pub mod action;
pub mod config;
pub mod flow;
pub mod keywords;
pub mod mapper;
pub mod review;
pub mod review_flow;
pub mod state;
pub mod store;

// Re-export commonly used types for convenience
pub use action::{Action, Effect, update};
pub use flow::BookSearchFlow;
pub use state::{SearchState, SearchVariant};
