//! Persistence adapters for the item collection.
//!
//! [`LocalStore`] keeps everything in a directory on this machine;
//! [`RemoteStore`] talks to the Lost & Found HTTP API.

mod local;
mod remote;
pub mod seed;

pub use local::{ADMIN_KEY, ITEMS_KEY, LocalStorage, LocalStore, TOKEN_KEY};
pub use remote::RemoteStore;

use async_trait::async_trait;
use domain_items::{Claimer, Item, ItemError, NewItem};
use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Admin login required (run `lostfound login`)")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Moderation mode is off (run `lostfound admin on`)")]
    AdminRequired,

    #[error("{0} is not supported by this store")]
    Unsupported(&'static str),

    #[error("Item not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Item(#[from] ItemError),

    #[error("Request failed with status {0}")]
    Status(StatusCode),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable home of the item collection.
///
/// Every mutation persists before returning; callers reload with
/// [`ItemStore::list`] afterwards.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Item>>;

    /// Assigns id, creation time and `unclaimed` status.
    async fn create(&self, item: NewItem) -> StoreResult<Item>;

    async fn claim(&self, id: Uuid, claimer: Claimer) -> StoreResult<Item>;

    /// Moderation only.
    async fn toggle_status(&self, id: Uuid) -> StoreResult<Item>;

    /// Moderation only.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
impl<T: ItemStore + ?Sized> ItemStore for Box<T> {
    async fn list(&self) -> StoreResult<Vec<Item>> {
        (**self).list().await
    }

    async fn create(&self, item: NewItem) -> StoreResult<Item> {
        (**self).create(item).await
    }

    async fn claim(&self, id: Uuid, claimer: Claimer) -> StoreResult<Item> {
        (**self).claim(id, claimer).await
    }

    async fn toggle_status(&self, id: Uuid) -> StoreResult<Item> {
        (**self).toggle_status(id).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        (**self).delete(id).await
    }
}
