//! Wiring for one client session.
//!
//! `AppContext` owns the single credential store and transport and hands
//! clones of them to the client, the repositories and the controllers. There
//! are no process-wide singletons; everything reaches its collaborators
//! through this object.

use std::sync::Arc;

use tracing::info;

use crate::client::LandmarkClient;
use crate::config::ClientConfig;
use crate::controller::{
    AuthController, LandmarkDetailController, LandmarkEditorController, LandmarkListController,
};
use crate::credentials::CredentialStore;
use crate::error::ApiError;
use crate::repository::{AuthRepository, LandmarkRepository};
use crate::transport::{HttpTransport, ReqwestTransport};

#[derive(Clone)]
pub struct AppContext {
    config: ClientConfig,
    credentials: CredentialStore,
    landmarks: LandmarkRepository,
    auth: AuthRepository,
}

impl AppContext {
    /// Build a context that talks to `config.base_url` over reqwest.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` when the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let credentials = CredentialStore::new();
        let client = LandmarkClient::new(&config.base_url, credentials.clone());
        let landmarks = LandmarkRepository::new(client.clone(), Arc::clone(&transport));
        let auth = AuthRepository::new(client, transport, credentials.clone());
        info!(base_url = %config.base_url, "landmark client ready");
        Self {
            config,
            credentials,
            landmarks,
            auth,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn landmarks(&self) -> &LandmarkRepository {
        &self.landmarks
    }

    pub fn auth(&self) -> &AuthRepository {
        &self.auth
    }

    pub fn list_controller(&self) -> LandmarkListController {
        LandmarkListController::new(self.landmarks.clone(), self.config.search_debounce)
    }

    pub fn detail_controller(&self) -> LandmarkDetailController {
        LandmarkDetailController::new(self.landmarks.clone())
    }

    pub fn editor_controller(&self) -> LandmarkEditorController {
        LandmarkEditorController::new(self.landmarks.clone())
    }

    pub fn auth_controller(&self) -> AuthController {
        AuthController::new(self.auth.clone())
    }
}
