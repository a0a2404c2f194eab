//! Composition root: builds the storage backends, token store, API client
//! and result cache from the loaded configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use sajuai_core::{
    ApiClient, Config, FileStorage, KeyringStorage, ResultCache, Storage, TokenStore,
};

/// Subdirectory of the data dir holding the persisted session
const SESSION_DIR: &str = "session";

/// Subdirectory of the data dir holding cached results
const CACHE_DIR: &str = "cache";

pub struct App {
    pub config: Config,
    pub client: ApiClient,
    pub cache: ResultCache,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let data_dir = config.data_dir()?;

        let token_storage: Arc<dyn Storage> = if config.use_keyring {
            debug!("Using OS keychain for session storage");
            Arc::new(KeyringStorage::new())
        } else {
            Arc::new(
                FileStorage::new(data_dir.join(SESSION_DIR))
                    .context("Failed to open session storage")?,
            )
        };
        let tokens = Arc::new(TokenStore::open(token_storage));

        let cache_storage = FileStorage::new(data_dir.join(CACHE_DIR))
            .context("Failed to open result cache")?;
        let cache = ResultCache::new(Arc::new(cache_storage));

        let client = ApiClient::new(&config, tokens).context("Failed to create API client")?;

        info!(
            api_url = %config.api_url,
            signed_in = client.token_store().is_authenticated(),
            "SajuAI client ready"
        );
        Ok(Self {
            config,
            client,
            cache,
        })
    }
}
