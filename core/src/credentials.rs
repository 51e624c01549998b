//! In-memory access/refresh token storage.
//!
//! One store is created per process (see `AppContext`) and cloned into the
//! client and the auth repository; clones share the same slot. Both tokens
//! live behind a single lock so a reader never sees the access token of one
//! login paired with the refresh token of another.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::TokenPair;

#[derive(Debug, Default)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Shared handle to the current token pair. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    tokens: Arc<RwLock<Tokens>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tokens(&self, access: impl Into<String>, refresh: impl Into<String>) {
        let mut tokens = self.tokens.write();
        tokens.access = Some(access.into());
        tokens.refresh = Some(refresh.into());
    }

    pub fn store(&self, pair: &TokenPair) {
        self.set_tokens(pair.access.clone(), pair.refresh.clone());
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.read().access.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.read().refresh.clone()
    }

    pub fn has_access_token(&self) -> bool {
        self.tokens.read().access.is_some()
    }

    pub fn clear(&self) {
        let mut tokens = self.tokens.write();
        tokens.access = None;
        tokens.refresh = None;
    }
}
