//! Access-token persistence.
//!
//! The console keeps the token returned by the login endpoint (or the root
//! token pasted by the user) for five days. Tokens live in the platform
//! credential store:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Service name used for keyring entries.
const SERVICE_NAME: &str = "rustmailer-console";

/// How long a stored token stays valid.
pub const TOKEN_LIFETIME_DAYS: i64 = 5;

/// A stored access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Bearer token.
    pub token: String,
    /// When the record stops being used.
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Creates a record issued at `now`.
    #[must_use]
    pub fn issued_at(token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at: now + Duration::days(TOKEN_LIFETIME_DAYS),
        }
    }

    /// Whether the record has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Where token records are kept.
pub trait TokenBackend: Send + Sync {
    /// Reads the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Platform credential store.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringBackend;

impl TokenBackend for KeyringBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entry = Entry::new(SERVICE_NAME, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => {
                debug!("No keyring entry for {key}");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, key)?;
        entry.set_password(value)?;
        debug!("Stored keyring entry for {key}");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!("Failed to delete keyring entry {key}: {e}");
                Err(e.into())
            }
        }
    }
}

/// In-process store, for tests and keyring-less environments.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Token storage for one server.
#[derive(Debug)]
pub struct SessionStore<B = KeyringBackend> {
    backend: B,
    key: String,
}

impl<B: TokenBackend> SessionStore<B> {
    /// Creates a store for tokens issued by `server_url`.
    #[must_use]
    pub fn new(backend: B, server_url: &str) -> Self {
        Self {
            backend,
            key: format!("access_token:{}", server_url.trim_end_matches('/')),
        }
    }

    /// Saves `token` with a fresh five-day expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn save(&self, token: &str) -> Result<TokenRecord> {
        self.save_at(token, Utc::now())
    }

    /// Saves `token` as if issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn save_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenRecord> {
        let record = TokenRecord::issued_at(token, now);
        self.backend
            .write(&self.key, &serde_json::to_string(&record)?)?;
        debug!("Saved access token, expires {}", record.expires_at);
        Ok(record)
    }

    /// Loads the stored token if it is still valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn load(&self) -> Result<Option<String>> {
        self.load_at(Utc::now())
    }

    /// Loads the stored token as seen at `now`.
    ///
    /// Expired or unreadable records are removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn load_at(&self, now: DateTime<Utc>) -> Result<Option<String>> {
        let Some(raw) = self.backend.read(&self.key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<TokenRecord>(&raw) {
            Ok(record) if !record.is_expired(now) => Ok(Some(record.token)),
            Ok(_) => {
                debug!("Stored access token expired");
                self.clear()?;
                Ok(None)
            }
            Err(e) => {
                warn!("Discarding unreadable token record: {e}");
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Forgets the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(&self.key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SERVER: &str = "http://localhost:15630/";

    fn store() -> SessionStore<MemoryBackend> {
        SessionStore::new(MemoryBackend::new(), SERVER)
    }

    #[test]
    fn test_save_and_load() {
        let store = store();
        let now = Utc::now();
        let record = store.save_at("abc", now).unwrap();
        assert_eq!(record.expires_at - now, Duration::days(5));
        assert_eq!(store.load_at(now).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_expired_token_is_cleared() {
        let store = store();
        let issued = Utc::now() - Duration::days(6);
        store.save_at("old", issued).unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.backend.read(&store.key).unwrap(), None);
    }

    #[test]
    fn test_expiry_boundary() {
        let record = TokenRecord::issued_at("t", Utc::now());
        assert!(!record.is_expired(record.expires_at - Duration::seconds(1)));
        assert!(record.is_expired(record.expires_at));
    }

    #[test]
    fn test_garbage_record_is_cleared() {
        let store = store();
        store.backend.write(&store.key, "not json").unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.backend.read(&store.key).unwrap(), None);
    }

    #[test]
    fn test_clear_missing_is_ok() {
        let store = store();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_key_ignores_trailing_slash() {
        let a = SessionStore::new(MemoryBackend::new(), "http://h:1/");
        let b = SessionStore::new(MemoryBackend::new(), "http://h:1");
        assert_eq!(a.key, b.key);
    }
}
