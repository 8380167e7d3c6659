//! Persistent key-value storage for session data.
//!
//! [`KeyValueStore`] is the port; [`MemoryStore`] and [`FileStore`] are the
//! two adapters. [`SessionStore`] sits on top and owns the single session
//! blob: the logged-in user's profile, serialized as JSON under
//! [`keys::CLIENTE`](crate::models::session::keys::CLIENTE).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::models::UserProfile;
use crate::models::session::keys;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file or a value could not be (de)serialized.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// SessionStore
// =============================================================================

/// The logged-in user's persisted profile.
///
/// Presence of the blob means "logged in". A blob that no longer parses is
/// treated as absent.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A session store that forgets everything on drop.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Persist `profile` as the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    #[instrument(skip(self, profile), fields(customer_id = %profile.id))]
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let blob = serde_json::to_string(profile)?;
        self.backend.set(keys::CLIENTE, blob).await
    }

    /// The current session's profile, if any.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend read fails; a corrupt blob
    /// yields `Ok(None)`.
    pub async fn profile(&self) -> Result<Option<UserProfile>, StorageError> {
        let Some(blob) = self.backend.get(keys::CLIENTE).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&blob) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!(error = %e, "Stored session is corrupt, treating as logged out");
                Ok(None)
            }
        }
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub async fn remove_profile(&self) -> Result<(), StorageError> {
        self.backend.remove(keys::CLIENTE).await
    }

    /// Whether a valid session is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    pub async fn is_logged_in(&self) -> Result<bool, StorageError> {
        Ok(self.profile().await?.is_some())
    }
}
