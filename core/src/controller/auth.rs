//! Login state for the entry screen.
//!
//! A failed login leaves the state in `Error`; the user resubmits. Where to
//! navigate after `Success` is up to the caller.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::repository::AuthRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Initial,
    Loading,
    Success,
    Error(String),
}

#[derive(Clone)]
pub struct AuthController {
    repository: AuthRepository,
    state: watch::Sender<AuthState>,
}

impl AuthController {
    pub fn new(repository: AuthRepository) -> Self {
        let (state, _) = watch::channel(AuthState::Initial);
        Self { repository, state }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Submit credentials. Returns `None` without sending anything while a
    /// submission is already outstanding.
    pub fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Option<JoinHandle<()>> {
        let submitted = self.state.send_if_modified(|state| {
            if *state == AuthState::Loading {
                return false;
            }
            *state = AuthState::Loading;
            true
        });
        if !submitted {
            debug!("login already in progress");
            return None;
        }

        let email = email.into();
        let password = password.into();
        let controller = self.clone();
        Some(tokio::spawn(async move {
            let next = match controller.repository.login(&email, &password).await {
                Ok(_) => AuthState::Success,
                Err(err) => AuthState::Error(err.to_string()),
            };
            controller.state.send_replace(next);
        }))
    }

    pub fn logout(&self) {
        self.repository.logout();
        self.state.send_replace(AuthState::Initial);
    }

    pub fn is_logged_in(&self) -> bool {
        self.repository.is_logged_in()
    }
}
