use async_trait::async_trait;
use chrono::NaiveDate;
use domain_items::{Claimer, Item, NewItem};
use std::io;
use std::path::{Path, PathBuf};
use tracing::instrument;
use uuid::Uuid;

use super::{ItemStore, StoreError, StoreResult, seed};

/// Serialized item collection
pub const ITEMS_KEY: &str = "lf_items_v1";
/// Moderation-mode flag, `"1"` or `"0"`
pub const ADMIN_KEY: &str = "lf_admin";
/// Cached admin bearer token
pub const TOKEN_KEY: &str = "lf_admin_token";

/// Directory-backed key/value slots, one file per key.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Open (and create if needed) the storage directory.
    pub async fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Raw slot contents, `None` when the slot was never written.
    pub async fn get_bytes(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, key: &str) -> io::Result<Option<String>> {
        self.get_bytes(key)
            .await?
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            })
            .transpose()
    }

    /// Replace a slot. Readers see either the old or the new value.
    pub async fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let tmp = self.dir.join(format!(".{key}.tmp"));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, self.path(key)).await
    }

    pub async fn remove(&self, key: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.path(key)).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Item collection kept in [`LocalStorage`] under [`ITEMS_KEY`].
///
/// Every operation is load, mutate, save. Moderation requires the
/// [`ADMIN_KEY`] flag.
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: LocalStorage,
}

impl LocalStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Stored collection; a missing or unreadable payload yields an empty one.
    #[instrument(skip(self))]
    pub async fn load(&self) -> StoreResult<Vec<Item>> {
        let Some(raw) = self.storage.get_bytes(ITEMS_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(error = %e, "Stored item collection is corrupt, starting empty");
                Ok(Vec::new())
            }
        }
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn save(&self, items: &[Item]) -> StoreResult<()> {
        let raw = serde_json::to_string(items)?;
        self.storage.set(ITEMS_KEY, &raw).await?;
        Ok(())
    }

    pub async fn is_admin(&self) -> StoreResult<bool> {
        Ok(self.storage.get(ADMIN_KEY).await?.as_deref() == Some("1"))
    }

    pub async fn set_admin(&self, on: bool) -> StoreResult<()> {
        self.storage
            .set(ADMIN_KEY, if on { "1" } else { "0" })
            .await?;
        Ok(())
    }

    /// Overwrite the collection with the demo items, dated relative to `today`.
    pub async fn seed(&self, today: NaiveDate) -> StoreResult<Vec<Item>> {
        let items = seed::demo_items(today);
        self.save(&items).await?;
        tracing::info!(count = items.len(), "Seeded demo items");
        Ok(items)
    }

    /// Seed only when the stored collection is empty.
    pub async fn seed_if_empty(&self, today: NaiveDate) -> StoreResult<()> {
        if self.load().await?.is_empty() {
            self.seed(today).await?;
        }
        Ok(())
    }

    async fn require_admin(&self) -> StoreResult<()> {
        if self.is_admin().await? {
            Ok(())
        } else {
            Err(StoreError::AdminRequired)
        }
    }

    async fn mutate_item<F>(&self, id: Uuid, mutate: F) -> StoreResult<Item>
    where
        F: FnOnce(&mut Item) -> StoreResult<()> + Send,
    {
        let mut items = self.load().await?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;

        mutate(item)?;
        let updated = item.clone();

        self.save(&items).await?;
        Ok(updated)
    }
}

#[async_trait]
impl ItemStore for LocalStore {
    async fn list(&self) -> StoreResult<Vec<Item>> {
        self.load().await
    }

    #[instrument(skip(self, item), fields(title = %item.title))]
    async fn create(&self, item: NewItem) -> StoreResult<Item> {
        let mut items = self.load().await?;
        let item = Item::new(item);
        items.insert(0, item.clone());
        self.save(&items).await?;

        tracing::info!(item_id = %item.id, "Item reported");
        Ok(item)
    }

    #[instrument(skip(self, claimer))]
    async fn claim(&self, id: Uuid, claimer: Claimer) -> StoreResult<Item> {
        self.mutate_item(id, |item| Ok(item.claim(claimer)?)).await
    }

    #[instrument(skip(self))]
    async fn toggle_status(&self, id: Uuid) -> StoreResult<Item> {
        self.require_admin().await?;
        self.mutate_item(id, |item| {
            item.toggle_status();
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.require_admin().await?;

        let mut items = self.load().await?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(StoreError::NotFound(id));
        }

        self.save(&items).await?;
        tracing::info!(item_id = %id, "Item deleted");
        Ok(())
    }
}
