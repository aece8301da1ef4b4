//! Credential storage backends
//!
//! ## Table of Contents
//! - **CredentialStore**: Trait for persisted key/value credential storage
//! - **MemoryCredentialStore**: In-memory store (tests, default on native)
//! - **FileCredentialStore**: JSON file store (native hosts)
//! - **LocalStorageCredentialStore**: Browser `localStorage` (wasm32)
//! - **Session**: Token and authenticated flag on top of a store

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
#[cfg(not(target_arch = "wasm32"))]
use tracing::debug;

use crate::error::{ApiError, Result};

/// Keys used in the credential store.
pub mod keys {
    /// Bearer token
    pub const TOKEN: &str = "token";
    /// Authenticated flag, holds [`AUTHENTICATED`] when logged in
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    /// Sentinel value of the authenticated flag
    pub const AUTHENTICATED: &str = "true";
}

/// Persisted string storage for session credentials.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Store name for logging
    fn name(&self) -> &str;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    data: RwLock<BTreeMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// JSON file store, written through on every change.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileCredentialStore {
    /// Open or create a file store
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ApiError::storage(format!("Failed to read store: {}", e)))?;
            serde_json::from_str(&contents)
                .map_err(|e| ApiError::storage(format!("Corrupt store {}: {}", path.display(), e)))?
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), "Credential store opened");

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(data)
            .map_err(|e| ApiError::storage(format!("Failed to encode store: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::storage(format!("Failed to create dir: {}", e)))?;
        }

        std::fs::write(&self.path, contents)
            .map_err(|e| ApiError::storage(format!("Failed to write store: {}", e)))?;

        debug!(path = %self.path.display(), "Credential store flushed");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.write();
        data.insert(key.to_string(), value.to_string());
        self.flush(&data)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut data = self.data.write();
        if data.remove(key).is_some() {
            self.flush(&data)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Browser `localStorage`, raw string values.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageCredentialStore;

#[cfg(target_arch = "wasm32")]
impl CredentialStore for LocalStorageCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        use gloo_storage::Storage;
        gloo_storage::LocalStorage::raw()
            .get_item(key)
            .map_err(|e| ApiError::storage(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        use gloo_storage::Storage;
        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| ApiError::storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        use gloo_storage::Storage;
        gloo_storage::LocalStorage::raw()
            .remove_item(key)
            .map_err(|e| ApiError::storage(format!("{:?}", e)))
    }

    fn name(&self) -> &str {
        "localStorage"
    }
}

/// Type alias for shared store
pub type SharedCredentialStore = Arc<dyn CredentialStore>;

/// Session context handed to the API client.
///
/// Writable by the login flow, logout and the session guard.
#[derive(Clone)]
pub struct Session {
    store: SharedCredentialStore,
}

impl Session {
    pub fn new(store: SharedCredentialStore) -> Self {
        Self { store }
    }

    /// Session over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    /// Session over the platform's persistent store.
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        Self::new(Arc::new(LocalStorageCredentialStore))
    }

    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    /// Stored bearer token. Unreadable storage counts as no token.
    pub fn token(&self) -> Option<String> {
        match self.store.get(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "Failed to read token");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.store.get(keys::IS_AUTHENTICATED),
            Ok(Some(flag)) if flag == keys::AUTHENTICATED
        )
    }

    /// Persist a freshly issued token and raise the authenticated flag.
    pub fn establish(&self, token: &str) -> Result<()> {
        self.store.set(keys::TOKEN, token)?;
        self.store.set(keys::IS_AUTHENTICATED, keys::AUTHENTICATED)
    }

    /// Remove token and flag. Both removals are attempted.
    pub fn clear(&self) -> Result<()> {
        let token = self.store.remove(keys::TOKEN);
        let flag = self.store.remove(keys::IS_AUTHENTICATED);
        token.and(flag)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store.name())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
