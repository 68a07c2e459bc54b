use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    config,
    error::StoreError,
    types::{Credentials, TrackedEntity},
};

/// Durable state the sync engine reads and advances.
#[async_trait]
pub trait SyncStore: Send + Sync {
    async fn get_credentials(&self) -> Result<Credentials, StoreError>;

    async fn get_tracked_entities(&self) -> Result<Vec<TrackedEntity>, StoreError>;

    /// Advances the checkpoint of `id` to `at`. Never moves it backwards.
    /// Returns `false` if the artist is not tracked (anymore).
    async fn mark_checked(&self, id: &str, at: DateTime<Utc>) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    credentials: Credentials,
    #[serde(default)]
    artists: Vec<TrackedEntity>,
}

/// [`SyncStore`] backed by a single JSON file in the local data directory.
///
/// The whole file is kept in memory and rewritten after every change.
pub struct JsonStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonStore {
    /// Opens the store at the default location.
    pub async fn load() -> Result<Self, StoreError> {
        Self::open(config::store_path()).await
    }

    /// Opens the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match async_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts tracking `id` with both timestamps set to `now`.
    ///
    /// Returns `false` if the artist was already tracked; its row is left
    /// as it is.
    pub async fn add_artist(&self, id: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;
        if data.artists.iter().any(|a| a.id == id) {
            return Ok(false);
        }

        data.artists.push(TrackedEntity::new(id, now));
        persist(&self.path, &data).await?;
        Ok(true)
    }

    pub async fn remove_artist(&self, id: &str) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;
        let before = data.artists.len();
        data.artists.retain(|a| a.id != id);
        if data.artists.len() == before {
            return Ok(false);
        }

        persist(&self.path, &data).await?;
        Ok(true)
    }

    pub async fn set_credentials(&self, credentials: Credentials) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        data.credentials = credentials;
        persist(&self.path, &data).await
    }

    /// True if a client id and secret are available, stored or from the
    /// environment.
    pub async fn has_credentials(&self) -> bool {
        let data = self.data.lock().await;
        Self::resolve_credentials(&data.credentials).is_complete()
    }

    /// Stored credentials with the environment filling in empty fields.
    fn resolve_credentials(stored: &Credentials) -> Credentials {
        let client_id = if stored.client_id.is_empty() {
            config::spotify_client_id().unwrap_or_default()
        } else {
            stored.client_id.clone()
        };
        let client_secret = if stored.client_secret.is_empty() {
            config::spotify_client_secret().unwrap_or_default()
        } else {
            stored.client_secret.clone()
        };

        Credentials {
            client_id,
            client_secret,
        }
    }
}

#[async_trait]
impl SyncStore for JsonStore {
    async fn get_credentials(&self) -> Result<Credentials, StoreError> {
        let data = self.data.lock().await;
        Ok(Self::resolve_credentials(&data.credentials))
    }

    async fn get_tracked_entities(&self) -> Result<Vec<TrackedEntity>, StoreError> {
        Ok(self.data.lock().await.artists.clone())
    }

    async fn mark_checked(&self, id: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;
        let Some(entity) = data.artists.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };

        if at <= entity.last_checked {
            return Ok(true);
        }

        entity.last_checked = at;
        persist(&self.path, &data).await?;
        Ok(true)
    }
}

async fn persist(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(data)?;
    // write-then-rename, readers never see a partial file
    let tmp = path.with_extension("json.tmp");
    async_fs::write(&tmp, json).await?;
    async_fs::rename(&tmp, path).await?;
    Ok(())
}
