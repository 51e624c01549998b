//! HTTP request builder and response parser for the landmark API.
//!
//! # Design
//! `LandmarkClient` holds the `base_url` and a handle to the credential
//! store. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`;
//! the transport executes the round-trip in between. The only state read
//! while building is the current access token, which becomes a bearer
//! header when present.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::credentials::CredentialStore;
use crate::error::ApiError;
use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, MultipartPart};
use crate::types::{
    ImageAttachment, Landmark, LandmarkFields, LandmarkFilters, LandmarkId, LoginRequest,
    RefreshRequest, TokenPair, COVER_IMAGE_FIELD,
};

/// Request builder and response parser for the landmark API.
#[derive(Debug, Clone)]
pub struct LandmarkClient {
    base_url: String,
    credentials: CredentialStore,
}

impl LandmarkClient {
    pub fn new(base_url: &str, credentials: CredentialStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let mut request = HttpRequest::new(method, format!("{}{path}", self.base_url));
        if let Some(token) = self.credentials.access_token() {
            request
                .headers
                .push(("authorization".to_string(), format!("Bearer {token}")));
        }
        request
    }

    fn landmark_path(id: LandmarkId) -> String {
        format!("/api/landmarks/{id}/")
    }

    pub fn build_list_landmarks(&self, filters: &LandmarkFilters) -> HttpRequest {
        let mut request = self.request(HttpMethod::Get, "/api/landmarks/");
        request.query = filters.to_query();
        request
    }

    pub fn build_get_landmark(&self, id: LandmarkId) -> HttpRequest {
        self.request(HttpMethod::Get, &Self::landmark_path(id))
    }

    pub fn build_create_landmark(
        &self,
        fields: &LandmarkFields,
        image: Option<&ImageAttachment>,
    ) -> HttpRequest {
        let mut request = self.request(HttpMethod::Post, "/api/landmarks/");
        attach_fields(&mut request, fields, image);
        request
    }

    pub fn build_update_landmark(
        &self,
        id: LandmarkId,
        fields: &LandmarkFields,
        image: Option<&ImageAttachment>,
    ) -> HttpRequest {
        let mut request = self.request(HttpMethod::Put, &Self::landmark_path(id));
        attach_fields(&mut request, fields, image);
        request
    }

    pub fn build_delete_landmark(&self, id: LandmarkId) -> HttpRequest {
        self.request(HttpMethod::Delete, &Self::landmark_path(id))
    }

    pub fn build_login(&self, email: &str, password: &str) -> Result<HttpRequest, ApiError> {
        let mut request = self.request(HttpMethod::Post, "/api/token/");
        attach_json(&mut request, &LoginRequest { email, password })?;
        Ok(request)
    }

    pub fn build_refresh(&self, refresh: &str) -> Result<HttpRequest, ApiError> {
        let mut request = self.request(HttpMethod::Post, "/api/token/refresh/");
        attach_json(&mut request, &RefreshRequest { refresh })?;
        Ok(request)
    }

    pub fn parse_list_landmarks(&self, response: HttpResponse) -> Result<Vec<Landmark>, ApiError> {
        decode(response)
    }

    pub fn parse_get_landmark(&self, response: HttpResponse) -> Result<Landmark, ApiError> {
        decode(response)
    }

    pub fn parse_create_landmark(&self, response: HttpResponse) -> Result<Landmark, ApiError> {
        decode(response)
    }

    pub fn parse_update_landmark(&self, response: HttpResponse) -> Result<Landmark, ApiError> {
        decode(response)
    }

    pub fn parse_delete_landmark(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_token_pair(&self, response: HttpResponse) -> Result<TokenPair, ApiError> {
        decode(response)
    }
}

/// Field-encoded without an image, multipart with one.
fn attach_fields(request: &mut HttpRequest, fields: &LandmarkFields, image: Option<&ImageAttachment>) {
    let pairs = fields.to_pairs();
    request.body = Some(match image {
        None => {
            request.headers.push((
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
            HttpBody::Form(pairs)
        }
        Some(image) => {
            let mut parts: Vec<MultipartPart> = pairs
                .into_iter()
                .map(|(name, value)| MultipartPart::Text { name, value })
                .collect();
            parts.push(MultipartPart::File {
                name: COVER_IMAGE_FIELD.to_string(),
                file_name: image.file_name.clone(),
                content_type: image.content_type.clone(),
                bytes: image.bytes.clone(),
            });
            HttpBody::Multipart(parts)
        }
    });
}

fn attach_json<T: serde::Serialize>(request: &mut HttpRequest, payload: &T) -> Result<(), ApiError> {
    let body = serde_json::to_string(payload).map_err(|e| ApiError::Encode(e.to_string()))?;
    request
        .headers
        .push(("content-type".to_string(), "application/json".to_string()));
    request.body = Some(HttpBody::Json(body));
    Ok(())
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

/// Map non-2xx responses to `ApiError::Api`, lifting the server's message
/// out of `detail` or `error` when the body is JSON.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.detail.or(body.error))
        .map(|value| match value {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        });
    Err(ApiError::Api {
        status: response.status,
        message,
        body: response.body.clone(),
    })
}
