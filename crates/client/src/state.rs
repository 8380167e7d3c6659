//! Application state shared across front-end commands.

use std::sync::Arc;

use tokio::sync::Mutex;

use santafe_core::Cart;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::services::{AuthService, CartService};
use crate::storage::{FileStore, SessionStore};

/// Application state.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend client, the persisted session and the in-memory cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    api: ApiClient,
    session: SessionStore,
    cart: Mutex<Cart>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("api", &self.inner.api)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state with the session stored in
    /// `config.session_file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let session = SessionStore::new(Arc::new(FileStore::new(config.session_file.clone())));
        Self::with_session(config, session)
    }

    /// Create application state over an existing session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn with_session(config: ClientConfig, session: SessionStore) -> Result<Self, AppError> {
        config.validate()?;
        let api = ApiClient::from_config(&config)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                session,
                cart: Mutex::new(Cart::new()),
            }),
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Authentication flows over this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.api, &self.inner.session, &self.inner.cart)
    }

    /// Cart operations over this state.
    #[must_use]
    pub fn cart(&self) -> CartService<'_> {
        CartService::new(&self.inner.cart)
    }
}
