//! MongoDB implementation of ItemRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_bson},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, NewItem, PatchItem};
use crate::repository::ItemRepository;

/// Collection holding item documents
pub const ITEMS_COLLECTION: &str = "items";

pub struct MongoItemRepository {
    collection: Collection<Item>,
}

impl MongoItemRepository {
    /// ```ignore
    /// let client = database::mongodb::connect("mongodb://localhost:27017/lostfound").await?;
    /// let repo = MongoItemRepository::new(client.database("lostfound"));
    /// repo.init_indexes().await?;
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, ITEMS_COLLECTION)
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Item>(collection_name);
        Self { collection }
    }

    pub fn collection(&self) -> &Collection<Item> {
        &self.collection
    }

    /// Create the index backing the newest-first listing.
    #[instrument(skip(self))]
    pub async fn init_indexes(&self) -> ItemResult<()> {
        let index = IndexModel::builder().keys(Self::list_sort()).build();
        self.collection.create_index(index).await?;
        tracing::info!(collection = ITEMS_COLLECTION, "Item indexes ensured");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    fn list_sort() -> Document {
        doc! { "dateFound": -1 }
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository {
    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn create(&self, input: NewItem) -> ItemResult<Item> {
        let item = Item::new(input);

        self.collection.insert_one(&item).await?;

        tracing::info!(item_id = %item.id, "Item created successfully");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let item = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ItemResult<Vec<Item>> {
        let cursor = self.collection.find(doc! {}).sort(Self::list_sort()).await?;
        let items: Vec<Item> = cursor.try_collect().await?;
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn update(&self, id: Uuid, patch: PatchItem) -> ItemResult<Item> {
        let filter = Self::id_filter(id);
        let mut item = self
            .collection
            .find_one(filter.clone())
            .await?
            .ok_or(ItemError::NotFound(id))?;

        item.apply_patch(&patch);

        self.collection.replace_one(filter, &item).await?;

        tracing::info!(item_id = %id, status = %item.status, "Item updated successfully");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ItemResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        let deleted = result.deleted_count > 0;
        if deleted {
            tracing::info!(item_id = %id, "Item deleted successfully");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_filter_targets_underscore_id() {
        let filter = MongoItemRepository::id_filter(Uuid::now_v7());
        assert!(filter.contains_key("_id"));
        assert_ne!(filter.get("_id"), Some(&Bson::Null));
    }

    #[test]
    fn test_list_sorted_newest_first() {
        assert_eq!(MongoItemRepository::list_sort(), doc! { "dateFound": -1 });
    }
}
