use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Storage, StoreError, StoreResult};

/// Stores each key as its own file inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.entry_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.entry_path(key)?;
        // Write to a sibling temp file and rename so a crash never leaves a torn entry
        let tmp = self.dir.join(format!(".{}.tmp", key));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        debug!(key, "Storage entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.entry_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Unique scratch directory under the system temp dir
    pub(crate) fn scratch_dir(label: &str) -> PathBuf {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        std::env::temp_dir().join(format!(
            "sajuai-{}-{}-{}",
            label,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn test_file_storage_set_get_remove() {
        let dir = scratch_dir("file-storage");
        let storage = FileStorage::new(&dir).unwrap();

        assert_eq!(storage.get("accessToken").unwrap(), None);

        storage.set("accessToken", "A1").unwrap();
        assert_eq!(storage.get("accessToken").unwrap().as_deref(), Some("A1"));
        assert!(storage.contains("accessToken").unwrap());

        storage.set("accessToken", "A2").unwrap();
        assert_eq!(storage.get("accessToken").unwrap().as_deref(), Some("A2"));

        storage.remove("accessToken").unwrap();
        assert_eq!(storage.get("accessToken").unwrap(), None);

        // Removing twice is fine
        storage.remove("accessToken").unwrap();

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = scratch_dir("file-reopen");
        {
            let storage = FileStorage::new(&dir).unwrap();
            storage.set("user", r#"{"id":1}"#).unwrap();
        }
        let reopened = FileStorage::new(&dir).unwrap();
        assert_eq!(reopened.get("user").unwrap().as_deref(), Some(r#"{"id":1}"#));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = scratch_dir("file-keys");
        let storage = FileStorage::new(&dir).unwrap();

        assert!(matches!(storage.set("../escape", "x"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(storage.get(""), Err(StoreError::InvalidKey(_))));

        std::fs::remove_dir_all(dir).ok();
    }
}
