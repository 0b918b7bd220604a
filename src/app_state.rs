//! Implements the structs that hold the state of the server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    auth::{Credentials, DEFAULT_COOKIE_DURATION},
    store::UserDataStore,
};

/// The state of the server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The store for per-user records.
    pub store: Arc<dyn UserDataStore>,

    /// The known users and their password hashes.
    pub credentials: Arc<Credentials>,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// `cookie_secret` should be a long random string; the actual signing key
    /// is derived from it.
    pub fn new(
        cookie_secret: &str,
        store: Arc<dyn UserDataStore>,
        credentials: Credentials,
    ) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            store,
            credentials: Arc::new(credentials),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// The state needed by handlers that read and write user records.
#[derive(Clone)]
pub struct WalletState {
    /// The store for per-user records.
    pub store: Arc<dyn UserDataStore>,
}

impl FromRef<AppState> for WalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The state needed by the admin pages: every user's record plus the list
/// of known users.
#[derive(Clone)]
pub struct AdminState {
    /// The store for per-user records.
    pub store: Arc<dyn UserDataStore>,

    /// The known users and their password hashes.
    pub credentials: Arc<Credentials>,
}

impl FromRef<AppState> for AdminState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            credentials: state.credentials.clone(),
        }
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
