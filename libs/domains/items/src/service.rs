//! Item Service - moderation logic on top of a repository

use core_config::{ConfigError, FromEnv, env_bool};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, Item, PatchItem};
use crate::repository::ItemRepository;

/// How `DELETE` treats an id that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Report success regardless
    #[default]
    Lenient,
    /// Report `NotFound`
    Strict,
}

impl FromEnv for DeletePolicy {
    /// `STRICT_DELETE=true` selects [`DeletePolicy::Strict`].
    fn from_env() -> Result<Self, ConfigError> {
        Ok(if env_bool("STRICT_DELETE", false)? {
            DeletePolicy::Strict
        } else {
            DeletePolicy::Lenient
        })
    }
}

pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
    delete_policy: DeletePolicy,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            delete_policy: DeletePolicy::default(),
        }
    }

    pub fn with_delete_policy(mut self, delete_policy: DeletePolicy) -> Self {
        self.delete_policy = delete_policy;
        self
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// Validate and store a new unclaimed item
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<Item> {
        let new_item = input.into_new_item()?;
        self.repository.create(new_item).await
    }

    /// Every item, newest `dateFound` first
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> ItemResult<Vec<Item>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn update_item(&self, id: Uuid, patch: PatchItem) -> ItemResult<Item> {
        self.repository.update(id, patch).await
    }

    /// Delete an item; a missing id is an error only under [`DeletePolicy::Strict`]
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: Uuid) -> ItemResult<()> {
        let deleted = self.repository.delete(id).await?;
        if !deleted {
            tracing::debug!(item_id = %id, policy = ?self.delete_policy, "Delete of unknown item");
            if self.delete_policy == DeletePolicy::Strict {
                return Err(ItemError::NotFound(id));
            }
        }
        Ok(())
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            delete_policy: self.delete_policy,
        }
    }
}
