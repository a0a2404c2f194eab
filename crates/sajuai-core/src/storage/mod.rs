//! Durable key/value storage for client state.
//!
//! The token store and result cache persist plain string entries through the
//! `Storage` trait. Three backends are provided:
//! - `FileStorage`: one file per key in the application data directory
//! - `KeyringStorage`: OS keychain entries via `keyring`
//! - `MemoryStorage`: process-local map, used by tests and throwaway sessions
//!
//! All operations are synchronous and write through before returning.

pub mod file;
pub mod keychain;
pub mod memory;

use thiserror::Error;

pub use self::file::FileStorage;
pub use self::keychain::KeyringStorage;
pub use self::memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// String key/value storage.
///
/// Removing a key that does not exist is not an error.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    fn remove(&self, key: &str) -> StoreResult<()>;

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
