use keyring::Entry;
use tracing::debug;

use super::{Storage, StoreResult};

/// Keychain service name used for every entry
const SERVICE_NAME: &str = "sajuai";

/// Stores entries in the OS keychain, one credential per key.
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> StoreResult<Entry> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for KeyringStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entry(key)?.set_password(value)?;
        debug!(key, service = %self.service, "Keychain entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
