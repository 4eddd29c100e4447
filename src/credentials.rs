//! Credential persistence
//!
//! A single API key is kept in a key-value store, read at the start of every
//! gateway call and written only by an explicit save. Two backends ship with
//! the crate: an in-process map and a JSON file on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::debug;

use crate::error::CredentialError;

/// Value stored by installs that never configured a key
pub const PLACEHOLDER_CREDENTIAL: &str = "YOUR_GOOGLE_SHEETS_API_KEY";

pub type Result<T> = std::result::Result<T, CredentialError>;

/// Key-value persistence for credential strings
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// A usable credential: present, non-blank and not the placeholder
pub fn configured_credential(store: &dyn CredentialStore, key: &str) -> Result<Option<String>> {
    Ok(store
        .get(key)?
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != PLACEHOLDER_CREDENTIAL))
}

/// In-process store; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(|_| CredentialError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| CredentialError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| CredentialError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten in full on every change.
/// A missing file reads as an empty store.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, text)?;
        debug!("credential store written to {}", self.path.display());
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.read().map_err(|_| CredentialError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.write().map_err(|_| CredentialError::Poisoned)?;
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.write().map_err(|_| CredentialError::Poisoned)?;
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}
