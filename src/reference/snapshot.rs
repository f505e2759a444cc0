use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::cache::Cache;
use crate::config::settings::ReferenceSettings;
use crate::reference::{ReferenceDatabase, ReferenceEntry};

const SNAPSHOT_CACHE_KEY: &str = "reference_players";
const DOWNLOAD_TIMEOUT_SECS: u64 = 600;

/// Reference database served from a published snapshot.
///
/// The snapshot is large and slow to fetch, so it is downloaded at most
/// once per run (and kept on disk between runs) and only when a lookup
/// actually happens.
pub struct HttpReferenceDatabase {
    client: Client,
    snapshot_url: String,
    cache: Cache,
    snapshot: Mutex<Option<HashMap<i64, ReferenceEntry>>>,
}

impl HttpReferenceDatabase {
    pub fn new(settings: &ReferenceSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            snapshot_url: settings.snapshot_url.clone(),
            cache: Cache::new(&settings.cache_dir)?,
            snapshot: Mutex::new(None),
        })
    }

    async fn fetch_snapshot(&self) -> Result<HashMap<i64, ReferenceEntry>> {
        if let Some(cached) = self.cache.load(SNAPSHOT_CACHE_KEY)? {
            return Ok(cached);
        }

        info!("Downloading the reference player database - this may take a while...");
        let snapshot: HashMap<i64, ReferenceEntry> = self
            .client
            .get(&self.snapshot_url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch reference database from {}", self.snapshot_url))?
            .error_for_status()
            .context("Reference database download was rejected")?
            .json()
            .await
            .context("Failed to decode reference database")?;
        info!("  → Loaded {} reference players", snapshot.len());

        if let Err(e) = self.cache.save(SNAPSHOT_CACHE_KEY, &snapshot) {
            warn!("Failed to cache reference database: {e:?}");
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl ReferenceDatabase for HttpReferenceDatabase {
    async fn lookup(&self, licenses: &[i64]) -> Result<HashMap<i64, ReferenceEntry>> {
        let mut guard = self.snapshot.lock().await;
        if guard.is_none() {
            *guard = Some(self.fetch_snapshot().await?);
        }
        let snapshot = guard.get_or_insert_with(HashMap::new);
        Ok(licenses
            .iter()
            .filter_map(|license| {
                snapshot
                    .get(license)
                    .map(|entry| (*license, entry.clone()))
            })
            .collect())
    }
}
