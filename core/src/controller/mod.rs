//! Screen-level state machines.
//!
//! Each controller publishes a single tagged state through a
//! `tokio::sync::watch` channel and starts its work on the ambient tokio
//! runtime. Operations return the spawned task's `JoinHandle` so callers
//! (and tests) can wait for the state to settle.

pub mod auth;
pub mod detail;
pub mod editor;
pub mod list;

pub use auth::{AuthController, AuthState};
pub use detail::{DetailState, LandmarkDetailController};
pub use editor::{EditorState, LandmarkEditorController, DEFAULT_DESCRIPTION};
pub use list::{LandmarkListController, ListState};
