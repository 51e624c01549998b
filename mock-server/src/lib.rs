//! In-memory stand-in for the landmark REST API.
//!
//! Serves the same routes and payload shapes as the real service: landmark
//! CRUD under `/api/landmarks/` and the token endpoints under `/api/token/`.
//! Coordinates are stored as six-decimal strings and `0.0` is normalized to
//! `null`, as the real backend does.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Landmark {
    pub id: i64,
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub cover_image: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Writable landmark fields, accepted as JSON, form or multipart.
#[derive(Debug, Default, Deserialize)]
pub struct LandmarkInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "decimal")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "decimal")]
    pub longitude: Option<f64>,
    #[serde(skip)]
    pub cover_image: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(f64),
    Text(String),
}

fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<RawDecimal>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawDecimal::Number(value)) => Ok(Some(value)),
        Some(RawDecimal::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawDecimal::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid decimal: {text:?}"))),
    }
}

impl LandmarkInput {
    fn set_text(&mut self, name: &str, value: String) -> Result<(), ApiFailure> {
        match name {
            "title" => self.title = Some(value),
            "category" => self.category = Some(value),
            "description" => self.description = Some(value),
            "country" => self.country = Some(value),
            "latitude" => self.latitude = parse_decimal(name, &value)?,
            "longitude" => self.longitude = parse_decimal(name, &value)?,
            _ => debug!(field = name, "ignoring unknown field"),
        }
        Ok(())
    }
}

fn parse_decimal(name: &str, value: &str) -> Result<Option<f64>, ApiFailure> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ApiFailure::bad_request(format!("{name}: A valid number is required.")))
}

/// Coordinates of exactly zero are stored as null.
fn store_decimal(value: Option<f64>) -> Option<String> {
    value.filter(|v| *v != 0.0).map(|v| format!("{v:.6}"))
}

#[derive(Debug, Clone)]
pub struct MockUser {
    pub email: String,
    pub password: String,
}

impl MockUser {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub users: Vec<MockUser>,
    /// Reject landmark requests without a valid bearer token.
    pub require_auth: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            users: vec![MockUser::new("a@b.com", "x")],
            require_auth: false,
        }
    }
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    /// Newest first.
    landmarks: Vec<Landmark>,
    access_tokens: HashSet<String>,
    refresh_tokens: HashMap<String, String>,
}

impl Store {
    fn insert(&mut self, input: LandmarkInput) -> Landmark {
        self.next_id += 1;
        let landmark = Landmark {
            id: self.next_id,
            title: input.title,
            category: input.category,
            description: input.description,
            country: input.country,
            cover_image: input.cover_image,
            latitude: store_decimal(input.latitude),
            longitude: store_decimal(input.longitude),
        };
        self.landmarks.insert(0, landmark.clone());
        landmark
    }

    fn issue_tokens(&mut self, email: &str) -> TokenPair {
        let pair = TokenPair {
            access: Uuid::new_v4().simple().to_string(),
            refresh: Uuid::new_v4().simple().to_string(),
        };
        self.access_tokens.insert(pair.access.clone());
        self.refresh_tokens.insert(pair.refresh.clone(), email.to_string());
        pair
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    config: Arc<MockConfig>,
}

/// Error response carrying a `detail` message.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    detail: String,
}

impl ApiFailure {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "No Landmark matches the given query.")
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

pub fn app() -> Router {
    app_with_config(MockConfig::default())
}

pub fn app_with_config(config: MockConfig) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        config: Arc::new(config),
    };
    Router::new()
        .route("/api/landmarks/", get(list_landmarks).post(create_landmark))
        .route(
            "/api/landmarks/{id}/",
            get(get_landmark).put(update_landmark).delete(delete_landmark),
        )
        .route("/api/token/", post(obtain_token))
        .route("/api/token/refresh/", post(refresh_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_config(listener, MockConfig::default()).await
}

pub async fn run_with_config(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, require_auth = config.require_auth, "mock landmark API listening");
    }
    axum::serve(listener, app_with_config(config)).await
}

async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiFailure> {
    if !state.config.require_auth {
        return Ok(());
    }
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match token {
        Some(token) if state.db.read().await.access_tokens.contains(token) => Ok(()),
        Some(_) => Err(ApiFailure::new(
            StatusCode::UNAUTHORIZED,
            "Given token not valid for any token type",
        )),
        None => Err(ApiFailure::new(
            StatusCode::UNAUTHORIZED,
            "Authentication credentials were not provided.",
        )),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
}

fn contains_ci(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|value| value.to_lowercase().contains(needle))
}

impl ListParams {
    fn matches(&self, landmark: &Landmark) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            let same = landmark
                .category
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case(category));
            if !same {
                return false;
            }
        }
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            if !contains_ci(&landmark.title, &title.to_lowercase()) {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref() {
            // Every term must hit at least one searchable field.
            for term in search.split_whitespace().map(str::to_lowercase) {
                let hit = contains_ci(&landmark.title, &term)
                    || contains_ci(&landmark.description, &term)
                    || contains_ci(&landmark.category, &term);
                if !hit {
                    return false;
                }
            }
        }
        true
    }
}

async fn list_landmarks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Landmark>>, ApiFailure> {
    authorize(&state, &headers).await?;
    let store = state.db.read().await;
    let landmarks = store
        .landmarks
        .iter()
        .filter(|landmark| params.matches(landmark))
        .cloned()
        .collect();
    Ok(Json(landmarks))
}

async fn get_landmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Landmark>, ApiFailure> {
    authorize(&state, &headers).await?;
    let store = state.db.read().await;
    store
        .landmarks
        .iter()
        .find(|landmark| landmark.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(ApiFailure::not_found)
}

/// Decode the body according to its content type.
async fn read_input(request: Request) -> Result<LandmarkInput, ApiFailure> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiFailure::bad_request(e.body_text()))?;
        let mut input = LandmarkInput::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiFailure::bad_request(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "cover_image" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiFailure::bad_request(e.body_text()))?;
                debug!(%file_name, size = bytes.len(), "received cover image");
                input.cover_image = Some(format!("/media/landmarks/{file_name}"));
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiFailure::bad_request(e.body_text()))?;
                input.set_text(&name, value)?;
            }
        }
        Ok(input)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(input) = Form::<LandmarkInput>::from_request(request, &())
            .await
            .map_err(|e| ApiFailure::bad_request(e.body_text()))?;
        Ok(input)
    } else {
        let Json(input) = Json::<LandmarkInput>::from_request(request, &())
            .await
            .map_err(|e| ApiFailure::bad_request(e.body_text()))?;
        Ok(input)
    }
}

async fn create_landmark(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<Landmark>), ApiFailure> {
    authorize(&state, request.headers()).await?;
    let input = read_input(request).await?;
    let landmark = state.db.write().await.insert(input);
    info!(id = landmark.id, "created landmark");
    Ok((StatusCode::CREATED, Json(landmark)))
}

async fn update_landmark(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Landmark>, ApiFailure> {
    authorize(&state, request.headers()).await?;
    let input = read_input(request).await?;
    let mut store = state.db.write().await;
    let landmark = store
        .landmarks
        .iter_mut()
        .find(|landmark| landmark.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    if input.title.is_some() {
        landmark.title = input.title;
    }
    if input.category.is_some() {
        landmark.category = input.category;
    }
    if input.description.is_some() {
        landmark.description = input.description;
    }
    if input.country.is_some() {
        landmark.country = input.country;
    }
    if input.cover_image.is_some() {
        landmark.cover_image = input.cover_image;
    }
    if input.latitude.is_some() {
        landmark.latitude = store_decimal(input.latitude);
    }
    if input.longitude.is_some() {
        landmark.longitude = store_decimal(input.longitude);
    }
    Ok(Json(landmark.clone()))
}

async fn delete_landmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiFailure> {
    authorize(&state, &headers).await?;
    let mut store = state.db.write().await;
    let before = store.landmarks.len();
    store.landmarks.retain(|landmark| landmark.id != id);
    if store.landmarks.len() == before {
        return Err(ApiFailure::not_found());
    }
    info!(id, "deleted landmark");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshInput {
    pub refresh: String,
}

async fn obtain_token(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<TokenPair>, ApiFailure> {
    let known = state
        .config
        .users
        .iter()
        .any(|user| user.email == input.email && user.password == input.password);
    if !known {
        return Err(ApiFailure::new(
            StatusCode::UNAUTHORIZED,
            "No active account found with the given credentials",
        ));
    }
    Ok(Json(state.db.write().await.issue_tokens(&input.email)))
}

async fn refresh_token(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> Result<Json<TokenPair>, ApiFailure> {
    let mut store = state.db.write().await;
    let Some(email) = store.refresh_tokens.remove(&input.refresh) else {
        return Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Token is invalid or expired"));
    };
    Ok(Json(store.issue_tokens(&email)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmark(title: &str, description: &str, category: &str) -> Landmark {
        Landmark {
            id: 1,
            title: Some(title.to_string()),
            category: Some(category.to_string()),
            description: Some(description.to_string()),
            country: None,
            cover_image: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn zero_coordinates_are_stored_as_null() {
        assert_eq!(store_decimal(Some(0.0)), None);
        assert_eq!(store_decimal(None), None);
        assert_eq!(store_decimal(Some(41.5)), Some("41.500000".to_string()));
    }

    #[test]
    fn input_accepts_numbers_and_strings() {
        let input: LandmarkInput =
            serde_json::from_str(r#"{"title":"T","latitude":"41.1","longitude":29}"#).unwrap();
        assert_eq!(input.latitude, Some(41.1));
        assert_eq!(input.longitude, Some(29.0));
    }

    #[test]
    fn search_requires_every_term() {
        let bell = landmark("Temple Bell", "bronze", "RELIGIOUS");
        let params = ListParams {
            search: Some("temple bell".to_string()),
            ..ListParams::default()
        };
        assert!(params.matches(&bell));
        assert!(!params.matches(&landmark("Temple Gate", "stone", "RELIGIOUS")));
    }

    #[test]
    fn search_covers_description_and_category() {
        let params = ListParams {
            search: Some("natural".to_string()),
            ..ListParams::default()
        };
        assert!(params.matches(&landmark("Falls", "", "NATURAL")));
        let params = ListParams {
            search: Some("bronze".to_string()),
            ..ListParams::default()
        };
        assert!(params.matches(&landmark("Bell", "cast in bronze", "OTHER")));
    }

    #[test]
    fn category_is_case_insensitive_exact() {
        let params = ListParams {
            category: Some("historical".to_string()),
            ..ListParams::default()
        };
        assert!(params.matches(&landmark("Wall", "", "HISTORICAL")));
        assert!(!params.matches(&landmark("Wall", "", "HISTORICAL_SITE")));
    }

    #[test]
    fn title_is_case_insensitive_contains() {
        let params = ListParams {
            title: Some("TOWER".to_string()),
            ..ListParams::default()
        };
        assert!(params.matches(&landmark("Galata Tower", "", "HISTORICAL")));
        assert!(!params.matches(&landmark("Galata Bridge", "tower nearby", "HISTORICAL")));
    }

    #[test]
    fn store_orders_newest_first() {
        let mut store = Store::default();
        store.insert(LandmarkInput {
            title: Some("first".to_string()),
            ..LandmarkInput::default()
        });
        store.insert(LandmarkInput {
            title: Some("second".to_string()),
            ..LandmarkInput::default()
        });
        let ids: Vec<i64> = store.landmarks.iter().map(|l| l.id).collect();
        assert_eq!(ids, [2, 1]);
    }
}
