//! Domain-level operations over the landmark and token endpoints.
//!
//! Every call is one build → execute → parse round-trip. Failures of any
//! kind come back as `RepositoryError`, so controllers only ever deal with a
//! value or a displayable error. No operation spans more than one request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::LandmarkClient;
use crate::credentials::CredentialStore;
use crate::error::{RepositoryError, RepositoryResult};
use crate::transport::HttpTransport;
use crate::types::{ImageAttachment, Landmark, LandmarkFields, LandmarkFilters, LandmarkId, TokenPair};

/// CRUD access to the landmark collection.
#[derive(Clone)]
pub struct LandmarkRepository {
    client: LandmarkClient,
    transport: Arc<dyn HttpTransport>,
}

impl LandmarkRepository {
    pub fn new(client: LandmarkClient, transport: Arc<dyn HttpTransport>) -> Self {
        Self { client, transport }
    }

    pub async fn list(&self, filters: &LandmarkFilters) -> RepositoryResult<Vec<Landmark>> {
        let request = self.client.build_list_landmarks(filters);
        let response = self.transport.execute(request).await?;
        let landmarks = self.client.parse_list_landmarks(response)?;
        debug!(count = landmarks.len(), "listed landmarks");
        Ok(landmarks)
    }

    pub async fn get(&self, id: LandmarkId) -> RepositoryResult<Landmark> {
        let request = self.client.build_get_landmark(id);
        let response = self.transport.execute(request).await?;
        Ok(self.client.parse_get_landmark(response)?)
    }

    /// Field-encoded without an image, multipart with one.
    pub async fn create(
        &self,
        fields: &LandmarkFields,
        image: Option<&ImageAttachment>,
    ) -> RepositoryResult<Landmark> {
        validate(fields)?;
        let request = self.client.build_create_landmark(fields, image);
        let response = self.transport.execute(request).await?;
        let landmark = self.client.parse_create_landmark(response)?;
        info!(id = landmark.id, with_image = image.is_some(), "created landmark");
        Ok(landmark)
    }

    pub async fn update(
        &self,
        id: LandmarkId,
        fields: &LandmarkFields,
        image: Option<&ImageAttachment>,
    ) -> RepositoryResult<Landmark> {
        validate(fields)?;
        let request = self.client.build_update_landmark(id, fields, image);
        let response = self.transport.execute(request).await?;
        let landmark = self.client.parse_update_landmark(response)?;
        info!(id, "updated landmark");
        Ok(landmark)
    }

    /// A missing id surfaces as the server's 404 `Api` failure.
    pub async fn delete(&self, id: LandmarkId) -> RepositoryResult<()> {
        let request = self.client.build_delete_landmark(id);
        let response = self.transport.execute(request).await?;
        self.client.parse_delete_landmark(response)?;
        info!(id, "deleted landmark");
        Ok(())
    }
}

fn validate(fields: &LandmarkFields) -> RepositoryResult<()> {
    if fields.title.trim().is_empty() {
        return Err(RepositoryError::InvalidInput("title must not be empty".to_string()));
    }
    Ok(())
}

/// Login, refresh and logout against the token endpoints.
///
/// The credential store is written only after a successful login or
/// refresh, and cleared on logout.
#[derive(Clone)]
pub struct AuthRepository {
    client: LandmarkClient,
    transport: Arc<dyn HttpTransport>,
    credentials: CredentialStore,
}

impl AuthRepository {
    pub fn new(
        client: LandmarkClient,
        transport: Arc<dyn HttpTransport>,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            client,
            transport,
            credentials,
        }
    }

    /// Network failures keep their transport message; any response that is
    /// not a token pair becomes `LoginFailed`.
    pub async fn login(&self, email: &str, password: &str) -> RepositoryResult<TokenPair> {
        let request = self.client.build_login(email, password)?;
        let response = self.transport.execute(request).await?;
        match self.client.parse_token_pair(response) {
            Ok(tokens) => {
                self.credentials.store(&tokens);
                info!("login succeeded");
                Ok(tokens)
            }
            Err(err) => {
                warn!(%err, "login rejected");
                Err(RepositoryError::LoginFailed)
            }
        }
    }

    /// Exchange the stored refresh token for a new pair. Never called
    /// automatically.
    pub async fn refresh(&self) -> RepositoryResult<TokenPair> {
        let refresh = self
            .credentials
            .refresh_token()
            .ok_or(RepositoryError::NoRefreshToken)?;
        let request = self.client.build_refresh(&refresh)?;
        let response = self.transport.execute(request).await?;
        match self.client.parse_token_pair(response) {
            Ok(tokens) => {
                self.credentials.store(&tokens);
                debug!("tokens refreshed");
                Ok(tokens)
            }
            Err(err) => {
                warn!(%err, "token refresh rejected");
                Err(RepositoryError::RefreshFailed)
            }
        }
    }

    pub fn logout(&self) {
        self.credentials.clear();
        info!("logged out");
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials.has_access_token()
    }
}
