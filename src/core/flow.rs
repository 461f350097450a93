//! # Search Flow Runtime
//!
//! Owns a `SearchState` and is its only writer. User events and service
//! completions both go through `dispatch()`, which runs `update()` and then
//! performs the returned effects.
//!
//! ```text
//!  UI ──dispatch(Action)──▶ update() ──Effect──▶ spawn service call
//!   ▲                                                │
//!   │ watch::Receiver<SearchState>                   │ completion Action
//!   └──────────── publish ◀── dispatch() ◀── mpsc ◀──┘
//! ```
//!
//! Background tasks never touch the state. They send their completion over
//! an mpsc channel that the owner drains with `process_next()` or `settle()`.
//! A task superseded by a newer request of the same kind is aborted.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, RequestTag, TaskKind, update};
use crate::core::state::{SearchState, SearchVariant};
use crate::core::store::KeywordStore;
use crate::service::BookSearchService;

pub struct BookSearchFlow {
    state: SearchState,
    service: Arc<dyn BookSearchService>,
    store: Arc<dyn KeywordStore>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Action>,
    tasks: HashMap<TaskKind, (u64, AbortHandle)>,
    publisher: watch::Sender<SearchState>,
}

impl BookSearchFlow {
    /// Creates the flow, seeding recent keywords from the store.
    pub fn new(
        variant: SearchVariant,
        service: Arc<dyn BookSearchService>,
        store: Arc<dyn KeywordStore>,
    ) -> Self {
        let state = SearchState::new(variant, store.load_or_empty());
        debug!(
            "Search flow ({:?}) using service {} with {} recent keywords",
            variant,
            service.name(),
            state.recent_keyword_list.len()
        );
        let (tx, rx) = mpsc::unbounded_channel();
        let (publisher, _) = watch::channel(state.clone());
        Self {
            state,
            service,
            store,
            tx,
            rx,
            tasks: HashMap::new(),
            publisher,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Observers receive every state the flow publishes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.publisher.subscribe()
    }

    /// True while any service request is in flight.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Applies one action, runs its effects and publishes the new state.
    ///
    /// Must be called from within a tokio runtime: effects spawn tasks.
    pub fn dispatch(&mut self, action: Action) -> &SearchState {
        if let Some((kind, generation)) = action.completion_of()
            && self.tasks.get(&kind).is_some_and(|(g, _)| *g == generation)
        {
            self.tasks.remove(&kind);
        }

        let effects = update(&mut self.state, action);
        for effect in effects {
            self.run_effect(effect);
        }

        self.publisher.send_replace(self.state.clone());
        &self.state
    }

    /// Waits for the next completion and dispatches it.
    /// Returns false if the channel is closed.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Dispatches completions until no request is in flight.
    pub async fn settle(&mut self) -> &SearchState {
        while self.has_pending() {
            if !self.process_next().await {
                break;
            }
        }
        &self.state
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SaveKeywords(list) => {
                if let Err(e) = self.store.save(&list) {
                    warn!("Failed to save recent keywords: {}", e);
                    let follow_up = update(&mut self.state, Action::KeywordsSaveFailed(e.to_string()));
                    debug_assert!(follow_up.is_empty());
                }
            }
            Effect::Cancel(kind) => {
                if let Some((generation, handle)) = self.tasks.remove(&kind) {
                    debug!("Cancelling {:?} request #{}", kind, generation);
                    handle.abort();
                }
            }
            Effect::FetchRelated(tag) => {
                let service = Arc::clone(&self.service);
                self.spawn(TaskKind::Related, tag.clone(), async move {
                    let result = service.related_keywords(&tag.query).await;
                    Action::RelatedKeywordsLoaded { tag, result }
                });
            }
            Effect::Search(tag) => {
                let service = Arc::clone(&self.service);
                self.spawn(TaskKind::Search, tag.clone(), async move {
                    let result = service.search_books(&tag.query).await;
                    Action::SearchCompleted { tag, result }
                });
            }
            Effect::FetchBookInfo(tag) => {
                let service = Arc::clone(&self.service);
                self.spawn(TaskKind::BookInfo, tag.clone(), async move {
                    let result = service.book_info(&tag.query).await;
                    Action::BookInfoLoaded { tag, result }
                });
            }
        }
    }

    fn spawn<F>(&mut self, kind: TaskKind, tag: RequestTag, request: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        debug!("Starting {:?} request #{} for {:?}", kind, tag.generation, tag.query);
        let mut guard = CompletionGuard {
            tx: Some(self.tx.clone()),
            kind,
            generation: tag.generation,
        };
        let handle = tokio::spawn(async move {
            let action = request.await;
            guard.complete(action);
        });

        if let Some((old, previous)) = self
            .tasks
            .insert(kind, (tag.generation, handle.abort_handle()))
        {
            debug!("Superseding {:?} request #{}", kind, old);
            previous.abort();
        }
    }
}

impl Drop for BookSearchFlow {
    fn drop(&mut self) {
        for (_, (_, handle)) in self.tasks.drain() {
            handle.abort();
        }
    }
}

/// Reports `TaskDropped` if a request task ends without completing,
/// so a panicking service cannot leave the flow loading forever.
struct CompletionGuard {
    tx: Option<mpsc::UnboundedSender<Action>>,
    kind: TaskKind,
    generation: u64,
}

impl CompletionGuard {
    fn complete(&mut self, action: Action) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(action);
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Action::TaskDropped {
                kind: self.kind,
                generation: self.generation,
            });
        }
    }
}
