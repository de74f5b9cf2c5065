//! In-process repository backed by a `Vec`, for tests and demos.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, NewItem, PatchItem};
use crate::repository::ItemRepository;

#[derive(Clone, Default)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<Vec<Item>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub async fn snapshot(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, input: NewItem) -> ItemResult<Item> {
        let item = Item::new(input);
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        Ok(self.items.read().await.iter().find(|i| i.id == id).cloned())
    }

    async fn list(&self) -> ItemResult<Vec<Item>> {
        let mut items = self.items.read().await.clone();
        items.sort_by(|a, b| b.date_found.cmp(&a.date_found));
        Ok(items)
    }

    async fn update(&self, id: Uuid, patch: PatchItem) -> ItemResult<Item> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(ItemError::NotFound(id))?;
        item.apply_patch(&patch);
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> ItemResult<bool> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|i| i.id != id);
        Ok(items.len() != before)
    }
}
