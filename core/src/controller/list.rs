//! View state for the landmark list and search screen.
//!
//! # Design
//! Every `load` takes the next generation number and cancels the token of
//! the load before it. A search-triggered load waits out the debounce delay
//! inside its own task, so a newer keystroke cancels it before any request
//! is sent. Results are applied under the tracker lock and only when their
//! generation is still the latest, which makes the displayed list follow
//! issuance order rather than response arrival order.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{RepositoryError, RepositoryResult};
use crate::repository::LandmarkRepository;
use crate::types::{Landmark, LandmarkFilters, LandmarkId};

/// What the list screen renders.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Success(Vec<Landmark>),
    Error(String),
}

impl ListState {
    pub fn is_success(&self) -> bool {
        matches!(self, ListState::Success(_))
    }

    pub fn landmarks(&self) -> Option<&[Landmark]> {
        match self {
            ListState::Success(items) => Some(items),
            _ => None,
        }
    }
}

#[derive(Default)]
struct LoadTracker {
    issued: u64,
    pending: Option<CancellationToken>,
    remembered: Option<Vec<Landmark>>,
}

impl LoadTracker {
    /// Cancel the outstanding load, if any, and claim the next generation.
    fn supersede(&mut self) -> u64 {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
        self.issued += 1;
        self.issued
    }
}

struct Inner {
    repository: LandmarkRepository,
    debounce: Duration,
    state: watch::Sender<ListState>,
    tracker: Mutex<LoadTracker>,
}

impl Inner {
    fn apply(&self, generation: u64, refinement: bool, result: RepositoryResult<Vec<Landmark>>) {
        let mut tracker = self.tracker.lock();
        if tracker.issued != generation {
            debug!(generation, latest = tracker.issued, "discarding stale load result");
            return;
        }
        tracker.pending = None;

        let next = match result {
            Ok(items) => {
                tracker.remembered = Some(items.clone());
                ListState::Success(items)
            }
            Err(err) => match &tracker.remembered {
                Some(items) if refinement && !items.is_empty() => {
                    warn!(%err, "search refinement failed, keeping previous results");
                    ListState::Success(items.clone())
                }
                _ => {
                    warn!(%err, "landmark load failed");
                    ListState::Error(err.to_string())
                }
            },
        };
        self.state.send_replace(next);
    }

    fn fail_delete(&self, tracker: &mut LoadTracker, id: LandmarkId, err: RepositoryError) {
        warn!(id, %err, "delete failed");
        tracker.remembered = None;
        self.state.send_replace(ListState::Error(err.to_string()));
    }
}

/// Owns the visible landmark collection. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct LandmarkListController {
    inner: Arc<Inner>,
}

impl LandmarkListController {
    pub fn new(repository: LandmarkRepository, debounce: Duration) -> Self {
        let (state, _) = watch::channel(ListState::Loading);
        Self {
            inner: Arc::new(Inner {
                repository,
                debounce,
                state,
                tracker: Mutex::new(LoadTracker::default()),
            }),
        }
    }

    pub fn state(&self) -> ListState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.inner.state.subscribe()
    }

    /// Issue a load, superseding any earlier one.
    ///
    /// Filtered loads are debounced. The current list stays visible while a
    /// load is outstanding unless nothing has loaded yet and there is no
    /// search text, in which case the state becomes `Loading`.
    pub fn load(&self, filters: LandmarkFilters) -> JoinHandle<()> {
        let mut tracker = self.inner.tracker.lock();
        self.issue(&mut tracker, filters)
    }

    /// Claims the next generation under the caller's tracker lock, so no
    /// other load can be issued between the caller's checks and this one.
    fn issue(&self, tracker: &mut LoadTracker, filters: LandmarkFilters) -> JoinHandle<()> {
        let refinement = !filters.is_empty();
        let token = CancellationToken::new();
        let generation = tracker.supersede();
        tracker.pending = Some(token.clone());
        let showing_results = self.inner.state.borrow().is_success();
        if !showing_results && filters.search_text().is_none() {
            self.inner.state.send_replace(ListState::Loading);
        }
        debug!(generation, refinement, "load issued");

        let inner = Arc::clone(&self.inner);
        let delay = if refinement { inner.debounce } else { Duration::ZERO };
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => None,
                result = async {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    inner.repository.list(&filters).await
                } => Some(result),
            };
            match outcome {
                Some(result) => inner.apply(generation, refinement, result),
                None => debug!(generation, "load superseded"),
            }
        })
    }

    /// Unfiltered load.
    pub fn reload(&self) -> JoinHandle<()> {
        self.load(LandmarkFilters::default())
    }

    pub fn search(&self, text: impl Into<String>) -> JoinHandle<()> {
        self.load(LandmarkFilters::search(text))
    }

    /// Delete, then reload the unfiltered list. A failed delete replaces the
    /// list with `Error`; the previous list is not restored.
    ///
    /// The delete takes a generation like any load. If a newer load is issued
    /// while the request is outstanding, the request still completes but its
    /// outcome is dropped: no `Error` is shown and no reload follows.
    pub fn delete(&self, id: LandmarkId) -> JoinHandle<()> {
        let generation = {
            let mut tracker = self.inner.tracker.lock();
            let generation = tracker.supersede();
            self.inner.state.send_replace(ListState::Loading);
            generation
        };
        debug!(generation, id, "delete issued");

        let controller = self.clone();
        tokio::spawn(async move {
            let result = controller.inner.repository.delete(id).await;
            let reload = {
                let mut tracker = controller.inner.tracker.lock();
                if tracker.issued != generation {
                    debug!(generation, latest = tracker.issued, id, "discarding stale delete outcome");
                    return;
                }
                match result {
                    Ok(()) => controller.issue(&mut tracker, LandmarkFilters::default()),
                    Err(err) => {
                        controller.inner.fail_delete(&mut tracker, id, err);
                        return;
                    }
                }
            };
            if let Err(err) = reload.await {
                warn!(%err, "reload after delete did not complete");
            }
        })
    }
}
