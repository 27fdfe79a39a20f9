//! Durable key-value backends for the credential pair
//!
//! The session store only ever reads and writes two string values; where they
//! live depends on the target: `localStorage` in the browser, a JSON file on
//! native targets, plain memory in tests.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "access";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage not available: {0}")]
    Unavailable(String),

    #[error("Failed to write storage: {0}")]
    Write(String),

    #[error("Storage data is corrupt: {0}")]
    Corrupt(String),
}

/// A string key-value store that survives restarts.
pub trait TokenStorage: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage; nothing outlives the value itself.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.write().remove(key);
        Ok(())
    }
}

impl<S: TokenStorage + ?Sized> TokenStorage for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[cfg(feature = "native")]
pub use file::FileStorage;

#[cfg(feature = "native")]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use parking_lot::Mutex;

    use super::{StorageError, TokenStorage};

    /// JSON object on disk, one entry per key.
    ///
    /// Every operation re-reads the file, so two processes sharing the path
    /// see each other's writes.
    #[derive(Debug)]
    pub struct FileStorage {
        path: PathBuf,
        write_lock: Mutex<()>,
    }

    impl FileStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                write_lock: Mutex::new(()),
            }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
            match std::fs::read_to_string(&self.path) {
                Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
                Ok(contents) => serde_json::from_str(&contents)
                    .map_err(|e| StorageError::Corrupt(e.to_string())),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(StorageError::Unavailable(e.to_string())),
            }
        }

        fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::Write(e.to_string()))?;
            }
            let json =
                serde_json::to_string_pretty(values).map_err(|e| StorageError::Write(e.to_string()))?;
            std::fs::write(&self.path, json).map_err(|e| StorageError::Write(e.to_string()))
        }
    }

    impl TokenStorage for FileStorage {
        fn load(&self, key: &str) -> Option<String> {
            match self.read_all() {
                Ok(mut values) => values.remove(key),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), "Ignoring session file: {}", e);
                    None
                }
            }
        }

        fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let _guard = self.write_lock.lock();
            // A corrupt file is replaced rather than blocking a fresh login.
            let mut values = self.read_all().unwrap_or_default();
            values.insert(key.to_string(), value.to_string());
            self.write_all(&values)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            let _guard = self.write_lock.lock();
            let mut values = match self.read_all() {
                Ok(values) => values,
                // Nothing readable is stored under any key.
                Err(StorageError::Corrupt(_)) => return Ok(()),
                Err(e) => return Err(e),
            };
            if values.remove(key).is_none() {
                return Ok(());
            }
            self.write_all(&values)
        }
    }
}

#[cfg(feature = "hydrate")]
pub use browser::BrowserStorage;

#[cfg(feature = "hydrate")]
mod browser {
    use super::{StorageError, TokenStorage};

    /// `window.localStorage`, looked up on every call.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserStorage;

    impl BrowserStorage {
        fn storage() -> Result<web_sys::Storage, StorageError> {
            let window =
                web_sys::window().ok_or_else(|| StorageError::Unavailable("No window".into()))?;
            window
                .local_storage()
                .map_err(|_| StorageError::Unavailable("Failed to get localStorage".into()))?
                .ok_or_else(|| StorageError::Unavailable("localStorage not available".into()))
        }
    }

    impl TokenStorage for BrowserStorage {
        fn load(&self, key: &str) -> Option<String> {
            Self::storage().ok()?.get_item(key).ok()?
        }

        fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Write(format!("{:?}", e)))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Write(format!("{:?}", e)))
        }
    }
}
