//! Store credential persistence
//!
//! Each profile is one [`StoredCredentials`] record keyed by its name. The
//! production backend is the OS keyring; `SHOPLINE_CREDENTIALS_FILE` switches
//! to a JSON file for machines without a secret service.

use super::Result;
use crate::error::StorageError;
use crate::utils::text::mask_secret;
use chrono::{DateTime, Duration, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const SERVICE_NAME: &str = "shopline-cli";
pub const CREDENTIALS_FILE_ENV: &str = "SHOPLINE_CREDENTIALS_FILE";

const ACCOUNT_PREFIX: &str = "store:";
// The OS keyring cannot enumerate entries, so profile names live in an index entry.
const INDEX_ACCOUNT: &str = "profiles";
const MAX_AGE_DAYS: i64 = 90;

/// Authentication data for one store profile.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct StoredCredentials {
    pub name: String,
    pub handle: String,
    pub access_token: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("access_token", &mask_secret(&self.access_token))
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl StoredCredentials {
    pub fn new(
        name: impl Into<String>,
        handle: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            access_token: access_token.into(),
            created_at: Some(Utc::now()),
        }
    }

    /// Checks the invariants every persisted record must hold.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| StorageError::InvalidRecord {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("profile name is empty"));
        }
        if self.handle.trim().is_empty() {
            return Err(invalid("store handle is empty"));
        }
        if self.access_token.trim().is_empty() {
            return Err(invalid("access token is empty"));
        }
        Ok(())
    }

    pub fn masked_token(&self) -> String {
        mask_secret(&self.access_token)
    }

    /// Credentials older than 90 days should be rotated.
    pub fn is_old(&self) -> bool {
        self.created_at
            .is_some_and(|created| Utc::now() - created > Duration::days(MAX_AGE_DAYS))
    }
}

/// Keyed collection of store profiles.
pub trait CredentialStore: Send + Sync {
    /// Profile names, sorted.
    fn list(&self) -> Result<Vec<String>>;
    fn get(&self, name: &str) -> Result<Option<StoredCredentials>>;
    /// Insert or replace the record with the same name.
    fn save(&self, credentials: &StoredCredentials) -> Result<()>;
    /// Returns whether a record was removed.
    fn delete(&self, name: &str) -> Result<bool>;
}

/// Opens the credential store for one invocation.
pub trait StoreOpener: Send + Sync {
    fn open(&self) -> Result<Box<dyn CredentialStore>>;
}

/// Picks the file backend when `SHOPLINE_CREDENTIALS_FILE` is set, the OS keyring otherwise.
#[derive(Debug, Clone, Default)]
pub struct SystemStoreOpener {
    pub credentials_file: Option<PathBuf>,
}

impl SystemStoreOpener {
    pub fn from_env() -> Self {
        Self {
            credentials_file: std::env::var(CREDENTIALS_FILE_ENV)
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

impl StoreOpener for SystemStoreOpener {
    fn open(&self) -> Result<Box<dyn CredentialStore>> {
        match &self.credentials_file {
            Some(path) => Ok(Box::new(FileStore::new(path.clone()))),
            None => Ok(Box::new(KeyringStore::open()?)),
        }
    }
}

/// OS keyring backend.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Opens the keyring and checks it so an unreachable secret service fails here.
    pub fn open() -> Result<Self> {
        let store = Self {
            service: SERVICE_NAME.to_string(),
        };
        store.read_index()?;
        Ok(store)
    }

    fn entry(&self, account: &str) -> Result<Entry> {
        Entry::new(&self.service, account).map_err(|e| StorageError::Keyring(e.to_string()))
    }

    fn read_secret(&self, account: &str) -> Result<Option<String>> {
        match self.entry(account)?.get_password() {
            Ok(v) => Ok(Some(v)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::Keyring(e.to_string())),
        }
    }

    fn read_index(&self) -> Result<Vec<String>> {
        match self.read_secret(INDEX_ACCOUNT)? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| StorageError::Serialize(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    fn write_index(&self, names: &[String]) -> Result<()> {
        let raw = serde_json::to_string(names).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.entry(INDEX_ACCOUNT)?
            .set_password(&raw)
            .map_err(|e| StorageError::Keyring(e.to_string()))
    }
}

impl CredentialStore for KeyringStore {
    fn list(&self) -> Result<Vec<String>> {
        let mut names = self.read_index()?;
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn get(&self, name: &str) -> Result<Option<StoredCredentials>> {
        let account = format!("{}{}", ACCOUNT_PREFIX, name);
        match self.read_secret(&account)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Serialize(e.to_string())),
            None => Ok(None),
        }
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        credentials.validate()?;
        let raw = serde_json::to_string(credentials)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        let account = format!("{}{}", ACCOUNT_PREFIX, credentials.name);
        self.entry(&account)?
            .set_password(&raw)
            .map_err(|e| StorageError::Keyring(e.to_string()))?;

        let mut names = self.list()?;
        if !names.contains(&credentials.name) {
            names.push(credentials.name.clone());
            names.sort();
            self.write_index(&names)?;
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let account = format!("{}{}", ACCOUNT_PREFIX, name);
        let removed = match self.entry(&account)?.delete_credential() {
            Ok(_) => true,
            Err(keyring::Error::NoEntry) => false,
            Err(e) => return Err(StorageError::Keyring(e.to_string())),
        };

        let mut names = self.list()?;
        let before = names.len();
        names.retain(|n| n != name);
        if names.len() != before {
            self.write_index(&names)?;
        }
        Ok(removed || names.len() != before)
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct CredentialsFile {
    #[serde(default)]
    profiles: BTreeMap<String, StoredCredentials>,
}

/// JSON file backend, written with owner-only permissions on Unix.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::FileIo {
            path: self.path.to_string_lossy().to_string(),
            source,
        }
    }

    fn read(&self) -> Result<CredentialsFile> {
        if !self.path.exists() {
            return Ok(CredentialsFile::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if content.trim().is_empty() {
            return Ok(CredentialsFile::default());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Serialize(e.to_string()))
    }

    fn write(&self, file: &CredentialsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let content = serde_json::to_string_pretty(file)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut handle = options.open(&self.path).map_err(|e| self.io_error(e))?;

        // A file created earlier with wider permissions is narrowed before the token lands.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            handle
                .set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }
        handle
            .write_all(content.as_bytes())
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.read()?.profiles.into_keys().collect())
    }

    fn get(&self, name: &str) -> Result<Option<StoredCredentials>> {
        Ok(self.read()?.profiles.remove(name))
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        credentials.validate()?;
        let mut file = self.read()?;
        file.profiles
            .insert(credentials.name.clone(), credentials.clone());
        self.write(&file)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let mut file = self.read()?;
        let removed = file.profiles.remove(name).is_some();
        if removed {
            self.write(&file)?;
        }
        Ok(removed)
    }
}

/// In-memory backend; clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<Mutex<BTreeMap<String, StoredCredentials>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = StoredCredentials>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.profiles.lock() {
            for creds in profiles {
                map.insert(creds.name.clone(), creds);
            }
        }
        store
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, StoredCredentials>>> {
        self.profiles
            .lock()
            .map_err(|_| StorageError::Keyring("in-memory store poisoned".to_string()))
    }
}

impl CredentialStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Option<StoredCredentials>> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        credentials.validate()?;
        self.lock()?
            .insert(credentials.name.clone(), credentials.clone());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.lock()?.remove(name).is_some())
    }
}

impl StoreOpener for MemoryStore {
    fn open(&self) -> Result<Box<dyn CredentialStore>> {
        Ok(Box::new(self.clone()))
    }
}
