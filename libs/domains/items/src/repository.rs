use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ItemResult;
use crate::models::{Item, NewItem, PatchItem};

/// Repository trait for Item persistence
///
/// Implementations assign ids and creation times, and must apply status
/// changes through [`Item::apply_patch`] so the claimer invariant holds in
/// every backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new unclaimed item
    async fn create(&self, input: NewItem) -> ItemResult<Item>;

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>>;

    /// All items, newest `dateFound` first
    async fn list(&self) -> ItemResult<Vec<Item>>;

    /// Apply a moderation patch; `NotFound` when the id is unknown
    async fn update(&self, id: Uuid, patch: PatchItem) -> ItemResult<Item>;

    /// Remove an item, returning whether anything was deleted
    async fn delete(&self, id: Uuid) -> ItemResult<bool>;
}
