//! Client core for the landmark catalog service.
//!
//! # Overview
//! Talks to the remote landmark API (list, search, get, create, update,
//! delete, login, token refresh), keeps the session's tokens in memory, and
//! exposes the screen-level state machines a UI renders from.
//!
//! # Design
//! - `LandmarkClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values; an `HttpTransport` performs the round-trip in between, so the
//!   wire format is testable without a server.
//! - Repositories wrap each round-trip and return `RepositoryError`; nothing
//!   below a controller leaks a raw transport failure upward.
//! - Controllers publish tagged states over `tokio::sync::watch`. The list
//!   controller debounces searches and applies only the most recently issued
//!   load.
//! - `AppContext` wires one credential store and one transport through
//!   everything; there is no global state.

pub mod client;
pub mod config;
pub mod context;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod http;
pub mod repository;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use client::LandmarkClient;
pub use config::{ClientConfig, ConfigError};
pub use context::AppContext;
pub use controller::{
    AuthController, AuthState, DetailState, EditorState, LandmarkDetailController,
    LandmarkEditorController, LandmarkListController, ListState,
};
pub use credentials::CredentialStore;
pub use error::{ApiError, RepositoryError, RepositoryResult};
pub use http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, MultipartPart};
pub use repository::{AuthRepository, LandmarkRepository};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{Category, ImageAttachment, Landmark, LandmarkFields, LandmarkFilters, LandmarkId, TokenPair};
