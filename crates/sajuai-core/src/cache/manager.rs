use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::AnalysisResult;
use crate::storage::Storage;

/// Storage key for the latest analysis
const LAST_RESULT_KEY: &str = "lastSajuResult";

/// Storage key for the recent-analysis list
const RECENT_RESULTS_KEY: &str = "recentSajuResults";

/// Recent results kept, newest first
pub const MAX_RECENT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            // 1h 30m+ rounds up to 2h
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Last and recent analysis results, persisted through `Storage`
pub struct ResultCache {
    storage: Arc<dyn Storage>,
    /// Serializes read-modify-write of the recent list
    write_lock: Mutex<()>,
}

impl ResultCache {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(contents) = self
            .storage
            .get(key)
            .with_context(|| format!("Failed to read cache entry: {}", key))?
        else {
            return Ok(None);
        };
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry: {}", key))?;
        Ok(Some(value))
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let contents = serde_json::to_string(value)?;
        self.storage
            .set(key, &contents)
            .with_context(|| format!("Failed to write cache entry: {}", key))?;
        Ok(())
    }

    /// Remember `result` as the latest analysis and push it onto the front
    /// of the recent list, dropping the oldest beyond `MAX_RECENT`
    pub fn record(&self, result: &AnalysisResult) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let entry = CachedData::new(result.clone());
        let mut recent = match self.load::<Vec<CachedData<AnalysisResult>>>(RECENT_RESULTS_KEY) {
            Ok(recent) => recent.unwrap_or_default(),
            Err(e) => {
                debug!(error = %e, "Discarding unreadable recent results");
                Vec::new()
            }
        };
        recent.insert(0, entry.clone());
        recent.truncate(MAX_RECENT);

        self.save(LAST_RESULT_KEY, &entry)?;
        self.save(RECENT_RESULTS_KEY, &recent)?;
        debug!(id = ?result.id, recent = recent.len(), "Cached analysis result");
        Ok(())
    }

    pub fn last(&self) -> Result<Option<CachedData<AnalysisResult>>> {
        self.load(LAST_RESULT_KEY)
    }

    /// Recent results, newest first
    pub fn recent(&self) -> Result<Vec<CachedData<AnalysisResult>>> {
        Ok(self.load(RECENT_RESULTS_KEY)?.unwrap_or_default())
    }

    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.storage.remove(LAST_RESULT_KEY)?;
        self.storage.remove(RECENT_RESULTS_KEY)?;
        debug!("Result cache cleared");
        Ok(())
    }
}
