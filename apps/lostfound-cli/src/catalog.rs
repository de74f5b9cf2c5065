//! Client-side controller over an [`ItemStore`].
//!
//! The catalog caches the last listing. Every mutation goes to the store
//! first and is followed by a reload, so the cache never runs ahead of
//! durable state.

use chrono::NaiveDate;
use domain_items::{
    Category, ClaimRequest, CreateItem, FieldErrors, FilterCriteria, ImageData, Item,
    apply_filters,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::store::{ItemStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    #[error("Could not read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FieldErrors> for CatalogError {
    fn from(errors: FieldErrors) -> Self {
        CatalogError::Validation(errors)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Fields of the report form. All optional so that gaps show up as
/// field errors.
#[derive(Debug, Clone, Default)]
pub struct ReportForm {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub location: Option<String>,
    pub date_found: Option<NaiveDate>,
    pub description: Option<String>,
    /// Photo to embed; read whole before anything is stored
    pub image: Option<PathBuf>,
}

pub struct Catalog<S: ItemStore> {
    store: S,
    items: Vec<Item>,
}

impl<S: ItemStore> Catalog<S> {
    /// Wrap a store and load its current collection.
    pub async fn load(store: S) -> CatalogResult<Self> {
        let mut catalog = Self {
            store,
            items: Vec::new(),
        };
        catalog.refresh().await?;
        Ok(catalog)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn refresh(&mut self) -> CatalogResult<()> {
        self.items = self.store.list().await?;
        Ok(())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn visible(&self, criteria: &FilterCriteria) -> Vec<Item> {
        apply_filters(&self.items, criteria)
    }

    pub fn find(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    #[instrument(skip(self, form))]
    pub async fn report_item(&mut self, form: ReportForm) -> CatalogResult<Item> {
        let new_item = CreateItem {
            title: form.title.unwrap_or_default(),
            category: form.category,
            location: form.location.unwrap_or_default(),
            date_found: form.date_found,
            description: form.description.unwrap_or_default(),
            image_data: None,
        }
        .into_new_item()?;

        let image_data = match form.image {
            Some(path) => Some(
                ImageData::from_file(&path)
                    .map_err(|source| CatalogError::Image { path, source })?,
            ),
            None => None,
        };

        let created = self
            .store
            .create(domain_items::NewItem {
                image_data,
                ..new_item
            })
            .await?;
        self.refresh().await?;
        Ok(created)
    }

    #[instrument(skip(self, claim))]
    pub async fn submit_claim(&mut self, id: Uuid, claim: ClaimRequest) -> CatalogResult<Item> {
        let claimer = claim.into_claimer()?;

        let item = self.find(id).ok_or(StoreError::NotFound(id))?;
        if item.is_claimed() {
            return Err(StoreError::Item(domain_items::ItemError::AlreadyClaimed(id)).into());
        }

        let claimed = self.store.claim(id, claimer).await?;
        self.refresh().await?;
        Ok(claimed)
    }

    #[instrument(skip(self))]
    pub async fn toggle_status(&mut self, id: Uuid) -> CatalogResult<Item> {
        let item = self.store.toggle_status(id).await?;
        self.refresh().await?;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&mut self, id: Uuid) -> CatalogResult<()> {
        self.store.delete(id).await?;
        self.refresh().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LocalStorage, LocalStore};
    use domain_items::{ItemError, ItemStatus, SortKey};
    use tempfile::TempDir;

    async fn catalog() -> (TempDir, Catalog<LocalStore>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path().join("data")).await.unwrap();
        let catalog = Catalog::load(LocalStore::new(storage)).await.unwrap();
        (dir, catalog)
    }

    fn form(title: &str, date: &str) -> ReportForm {
        ReportForm {
            title: Some(format!("  {title}  ")),
            category: Some(Category::Electronics),
            location: Some("Hallway C".to_string()),
            date_found: Some(date.parse().unwrap()),
            description: Some("USB-C 65W".to_string()),
            image: None,
        }
    }

    fn claim(email: &str, details: &str) -> ClaimRequest {
        ClaimRequest {
            name: "Sam".to_string(),
            email: email.to_string(),
            details: details.to_string(),
        }
    }

    #[tokio::test]
    async fn test_report_trims_and_reloads() {
        let (_dir, mut catalog) = catalog().await;
        let item = catalog
            .report_item(form("Chromebook Charger", "2024-01-10"))
            .await
            .unwrap();

        assert_eq!(item.title, "Chromebook Charger");
        assert_eq!(item.status, ItemStatus::Unclaimed);
        assert_eq!(catalog.items(), &[item.clone()]);
        assert_eq!(catalog.find(item.id), Some(&item));
    }

    #[tokio::test]
    async fn test_report_missing_fields_persists_nothing() {
        let (_dir, mut catalog) = catalog().await;
        let err = catalog
            .report_item(ReportForm {
                title: Some("   ".to_string()),
                ..ReportForm::default()
            })
            .await
            .unwrap_err();

        let CatalogError::Validation(fields) = err else {
            panic!("expected validation error, got {err:?}");
        };
        for field in ["title", "category", "location", "dateFound", "description"] {
            assert_eq!(fields.get(field), Some("Required"), "{field}");
        }
        assert!(catalog.store().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_with_unreadable_image_persists_nothing() {
        let (dir, mut catalog) = catalog().await;
        let mut report = form("Scarf", "2024-01-10");
        report.image = Some(dir.path().join("missing.png"));

        let err = catalog.report_item(report).await.unwrap_err();
        assert!(matches!(err, CatalogError::Image { .. }));
        assert!(catalog.store().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_embeds_image() {
        let (dir, mut catalog) = catalog().await;
        let path = dir.path().join("photo.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let mut report = form("Scarf", "2024-01-10");
        report.image = Some(path);

        let item = catalog.report_item(report).await.unwrap();
        let image = item.image_data.unwrap();
        assert_eq!(image.mime, "image/png");
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_claim_validation() {
        let (_dir, mut catalog) = catalog().await;
        let item = catalog.report_item(form("Keys", "2024-01-10")).await.unwrap();

        let err = catalog
            .submit_claim(item.id, claim("bad-email", "red tag on it"))
            .await
            .unwrap_err();
        let CatalogError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.get("email"), Some("Valid email required"));

        let err = catalog
            .submit_claim(item.id, claim("a@b.co", " short  "))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(!catalog.find(item.id).unwrap().is_claimed());

        let claimed = catalog
            .submit_claim(item.id, claim("a@b.co", "red tag on it"))
            .await
            .unwrap();
        assert_eq!(claimed.status, ItemStatus::Claimed);
        assert_eq!(claimed.claimer.unwrap().email, "a@b.co");
        assert!(catalog.find(item.id).unwrap().is_claimed());
    }

    #[tokio::test]
    async fn test_claim_rejects_already_claimed() {
        let (_dir, mut catalog) = catalog().await;
        let item = catalog.report_item(form("Keys", "2024-01-10")).await.unwrap();
        catalog
            .submit_claim(item.id, claim("a@b.co", "red tag on it"))
            .await
            .unwrap();

        let err = catalog
            .submit_claim(item.id, claim("c@d.co", "mine, really"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Store(StoreError::Item(ItemError::AlreadyClaimed(_)))
        ));
    }

    #[tokio::test]
    async fn test_moderation_round_trip() {
        let (_dir, mut catalog) = catalog().await;
        catalog.store().set_admin(true).await.unwrap();
        let item = catalog.report_item(form("Keys", "2024-01-10")).await.unwrap();

        let toggled = catalog.toggle_status(item.id).await.unwrap();
        assert_eq!(toggled.status, ItemStatus::Claimed);
        assert!(catalog.find(item.id).unwrap().is_claimed());

        catalog.delete_item(item.id).await.unwrap();
        assert!(catalog.items().is_empty());
    }

    #[tokio::test]
    async fn test_visible_applies_filters_to_cache() {
        let (_dir, mut catalog) = catalog().await;
        catalog.report_item(form("Older", "2024-01-01")).await.unwrap();
        catalog.report_item(form("Newer", "2024-01-09")).await.unwrap();

        let oldest_first = catalog.visible(&FilterCriteria {
            sort: SortKey::Oldest,
            ..FilterCriteria::default()
        });
        let titles: Vec<_> = oldest_first.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Older", "Newer"]);

        let from_jan_5 = catalog.visible(&FilterCriteria {
            from: Some("2024-01-05".parse().unwrap()),
            ..FilterCriteria::default()
        });
        assert_eq!(from_jan_5.len(), 1);
    }
}
