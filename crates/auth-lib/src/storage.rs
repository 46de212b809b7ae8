// ============================
// crates/auth-lib/src/storage.rs
// ============================
//! Credential store abstraction with in-memory and flat-file implementations.
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::error::AppError;

/// JSON array of every registered user with its password digest
pub const USERS_KEY: &str = "mock_db_users";
/// Mock token of the active session
pub const TOKEN_KEY: &str = "secure_auth_token";
/// JSON user record of the active session
pub const USER_KEY: &str = "secure_auth_user";

/// Durable string key-value store. Operations are synchronous and unlocked;
/// callers that read-modify-write must serialize themselves.
pub trait CredentialStore: Send + Sync {
    /// Read a value, `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Create or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), AppError>;

    /// Remove every key
    fn clear(&self) -> Result<(), AppError>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), AppError> {
        (**self).clear()
    }
}

/// Volatile store, used by tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        self.entries.write().clear();
        Ok(())
    }
}

/// Suffix of key files written by [`FlatFileStore`]
pub const KEY_FILE_SUFFIX: &str = ".kv";
const TMP_SUFFIX: &str = ".tmp";

fn is_store_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Flat-file implementation: one `<key>.kv` file per key under a root
/// directory. Other files in the directory are never touched.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    root: PathBuf,
}

impl FlatFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        if !is_store_key(key) {
            return Err(AppError::InvalidInput(format!("invalid store key `{key}`")));
        }
        Ok(self.root.join(format!("{key}{KEY_FILE_SUFFIX}")))
    }

    /// Whether `file_name` is a key file (or its in-flight temp file)
    fn owns(file_name: &str) -> bool {
        let name = file_name.strip_suffix(TMP_SUFFIX).unwrap_or(file_name);
        name.strip_suffix(KEY_FILE_SUFFIX).is_some_and(is_store_key)
    }
}

impl CredentialStore for FlatFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        // write-then-rename so readers never see a half-written value
        let mut tmp = path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<(), AppError> {
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let owned = entry.file_name().to_str().is_some_and(Self::owns);
            if owned && entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}
