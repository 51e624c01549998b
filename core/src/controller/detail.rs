//! View state for a single landmark.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::repository::LandmarkRepository;
use crate::types::{Landmark, LandmarkId};

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Success(Landmark),
    Error(String),
    /// The landmark was removed; the caller navigates away.
    Deleted,
}

#[derive(Clone)]
pub struct LandmarkDetailController {
    repository: LandmarkRepository,
    state: watch::Sender<DetailState>,
}

impl LandmarkDetailController {
    pub fn new(repository: LandmarkRepository) -> Self {
        let (state, _) = watch::channel(DetailState::Loading);
        Self { repository, state }
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn load(&self, id: LandmarkId) -> JoinHandle<()> {
        self.state.send_replace(DetailState::Loading);
        let controller = self.clone();
        tokio::spawn(async move {
            let next = match controller.repository.get(id).await {
                Ok(landmark) => DetailState::Success(landmark),
                Err(err) => {
                    warn!(id, %err, "failed to load landmark");
                    DetailState::Error(err.to_string())
                }
            };
            controller.state.send_replace(next);
        })
    }

    pub fn delete(&self, id: LandmarkId) -> JoinHandle<()> {
        self.state.send_replace(DetailState::Loading);
        let controller = self.clone();
        tokio::spawn(async move {
            let next = match controller.repository.delete(id).await {
                Ok(()) => DetailState::Deleted,
                Err(err) => {
                    warn!(id, %err, "failed to delete landmark");
                    DetailState::Error(err.to_string())
                }
            };
            controller.state.send_replace(next);
        })
    }
}
