//! Domain types for the landmark API.
//!
//! # Design
//! These types mirror the remote schema but decode leniently: the server
//! emits decimal coordinates as strings, leaves optional text columns `null`
//! and may carry category values the client does not know. Decoding folds
//! all of that into a `Landmark` whose fields are always populated, so the
//! controllers never deal with half-formed records.

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Landmark identifier. Assigned by the server; `0` until persisted.
pub type LandmarkId = i64;

/// Part name the server expects for the uploaded cover image.
pub const COVER_IMAGE_FIELD: &str = "cover_image";

/// A catalogued point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    #[serde(default)]
    pub id: LandmarkId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "cover_image", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "coordinate")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "coordinate")]
    pub longitude: f64,
}

/// Landmark category. Unknown or missing server values fold to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Religious,
    Historical,
    Natural,
    Cultural,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Religious,
        Category::Historical,
        Category::Natural,
        Category::Cultural,
        Category::Other,
    ];

    /// Value used on the wire and in query filters.
    pub const fn api_value(self) -> &'static str {
        match self {
            Category::Religious => "RELIGIOUS",
            Category::Historical => "HISTORICAL",
            Category::Natural => "NATURAL",
            Category::Cultural => "CULTURAL",
            Category::Other => "OTHER",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Category::Religious => "Religious Tourism",
            Category::Historical => "Historical",
            Category::Natural => "Natural",
            Category::Cultural => "Cultural",
            Category::Other => "Other",
        }
    }

    /// Exact match on the upper-case API value; anything else is `Other`.
    pub fn from_api_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.api_value() == value)
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.api_value())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(Category::from_api_value)
            .unwrap_or_default())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

/// Accepts a JSON number, a decimal string or `null` (read as `0.0`).
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<RawCoordinate>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(RawCoordinate::Number(value)) => Ok(value),
        Some(RawCoordinate::Text(text)) if text.trim().is_empty() => Ok(0.0),
        Some(RawCoordinate::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid coordinate: {text:?}"))),
    }
}

/// Editable landmark fields sent on create and update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandmarkFields {
    pub title: String,
    pub category: Category,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country: Option<String>,
}

impl LandmarkFields {
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            category,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Field/value pairs in wire order. Absent optionals are omitted.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("title".to_string(), self.title.clone()),
            ("category".to_string(), self.category.api_value().to_string()),
            ("description".to_string(), self.description.clone()),
        ];
        if let Some(latitude) = self.latitude {
            pairs.push(("latitude".to_string(), latitude.to_string()));
        }
        if let Some(longitude) = self.longitude {
            pairs.push(("longitude".to_string(), longitude.to_string()));
        }
        if let Some(country) = &self.country {
            pairs.push(("country".to_string(), country.clone()));
        }
        pairs
    }
}

/// An image file to upload alongside a create or update.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, inferring the content type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        let content_type = content_type_for(path).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

// Image bytes are omitted from debug output.
impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/*",
    }
}

/// Optional list filters. Blank strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LandmarkFilters {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub title: Option<String>,
}

impl LandmarkFilters {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn search_text(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    pub fn title_text(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// True when no filter narrows the result set.
    pub fn is_empty(&self) -> bool {
        self.search_text().is_none() && self.category.is_none() && self.title_text().is_none()
    }

    /// Query parameters for the list endpoint.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search_text() {
            query.push(("search".to_string(), search.to_string()));
        }
        if let Some(category) = self.category {
            query.push(("category".to_string(), category.api_value().to_string()));
        }
        if let Some(title) = self.title_text() {
            query.push(("title".to_string(), title.to_string()));
        }
        query
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// Access/refresh token pair issued by the token endpoints.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}

/// Request payload for the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request payload for the refresh endpoint.
#[derive(Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}
