//! View state for the add/edit landmark form.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::RepositoryResult;
use crate::repository::LandmarkRepository;
use crate::types::{ImageAttachment, Landmark, LandmarkFields, LandmarkId};

/// Substituted for an empty description on create.
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    Initial,
    Loading,
    Success(Landmark),
    Error(String),
}

#[derive(Clone)]
pub struct LandmarkEditorController {
    repository: LandmarkRepository,
    state: watch::Sender<EditorState>,
}

impl LandmarkEditorController {
    pub fn new(repository: LandmarkRepository) -> Self {
        let (state, _) = watch::channel(EditorState::Initial);
        Self { repository, state }
    }

    pub fn state(&self) -> EditorState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EditorState> {
        self.state.subscribe()
    }

    pub fn create(&self, mut fields: LandmarkFields, image: Option<ImageAttachment>) -> JoinHandle<()> {
        if fields.description.trim().is_empty() {
            fields.description = DEFAULT_DESCRIPTION.to_string();
        }
        self.state.send_replace(EditorState::Loading);
        let controller = self.clone();
        tokio::spawn(async move {
            let result = controller.repository.create(&fields, image.as_ref()).await;
            controller.finish(result);
        })
    }

    pub fn update(
        &self,
        id: LandmarkId,
        fields: LandmarkFields,
        image: Option<ImageAttachment>,
    ) -> JoinHandle<()> {
        self.state.send_replace(EditorState::Loading);
        let controller = self.clone();
        tokio::spawn(async move {
            let result = controller.repository.update(id, &fields, image.as_ref()).await;
            controller.finish(result);
        })
    }

    /// Back to `Initial`, e.g. when the form is reopened.
    pub fn reset(&self) {
        self.state.send_replace(EditorState::Initial);
    }

    fn finish(&self, result: RepositoryResult<Landmark>) {
        let next = match result {
            Ok(landmark) => EditorState::Success(landmark),
            Err(err) => {
                warn!(%err, "failed to save landmark");
                EditorState::Error(err.to_string())
            }
        };
        self.state.send_replace(next);
    }
}
