use async_trait::async_trait;
use domain_items::{Claimer, CreateItem, Item, ItemList, LoginRequest, NewItem, PatchItem, TokenResponse};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::instrument;
use uuid::Uuid;

use super::{ItemStore, StoreError, StoreResult};
use crate::session::Session;

/// Item collection served by the Lost & Found API.
///
/// Mutations need a bearer token from [`RemoteStore::login`]. A `401`
/// discards the cached token. No retries and no client timeout.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    session: Session,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Exchange the admin password for a token and cache it.
    #[instrument(skip_all)]
    pub async fn login(&self, password: &str) -> StoreResult<()> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest {
                password: password.to_string(),
            })
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(StoreError::InvalidCredentials),
            status if !status.is_success() => Err(StoreError::Status(status)),
            _ => {
                let TokenResponse { token } = response.json().await?;
                self.session.log_in(&token).await?;
                tracing::info!("Admin session started");
                Ok(())
            }
        }
    }

    async fn authorized(&self, request: RequestBuilder) -> StoreResult<Response> {
        let token = self.session.token().await?.ok_or(StoreError::Unauthorized)?;
        Ok(request.bearer_auth(token).send().await?)
    }

    /// Map non-success statuses; a 401 also ends the session.
    async fn check(&self, response: Response, id: Option<Uuid>) -> StoreResult<Response> {
        match (response.status(), id) {
            (StatusCode::UNAUTHORIZED, _) => {
                tracing::warn!("Token rejected, clearing admin session");
                self.session.log_out().await?;
                Err(StoreError::Unauthorized)
            }
            (StatusCode::NOT_FOUND, Some(id)) => Err(StoreError::NotFound(id)),
            (status, _) if !status.is_success() => Err(StoreError::Status(status)),
            _ => Ok(response),
        }
    }

    async fn patch_toggle(&self, id: Uuid) -> StoreResult<Item> {
        let request = self
            .client
            .patch(self.url(&format!("/items/{id}")))
            .json(&PatchItem { toggle_status: true });
        let response = self.authorized(request).await?;
        Ok(self.check(response, Some(id)).await?.json().await?)
    }
}

fn create_body(item: NewItem) -> CreateItem {
    CreateItem {
        title: item.title,
        category: Some(item.category),
        location: item.location,
        date_found: Some(item.date_found),
        description: item.description,
        image_data: item.image_data,
    }
}

#[async_trait]
impl ItemStore for RemoteStore {
    #[instrument(skip(self))]
    async fn list(&self) -> StoreResult<Vec<Item>> {
        let response = self.client.get(self.url("/items")).send().await?;
        let ItemList { items } = self.check(response, None).await?.json().await?;
        Ok(items)
    }

    #[instrument(skip(self, item), fields(title = %item.title))]
    async fn create(&self, item: NewItem) -> StoreResult<Item> {
        let request = self.client.post(self.url("/items")).json(&create_body(item));
        let response = self.authorized(request).await?;
        Ok(self.check(response, None).await?.json().await?)
    }

    async fn claim(&self, _id: Uuid, _claimer: Claimer) -> StoreResult<Item> {
        Err(StoreError::Unsupported("Claiming"))
    }

    #[instrument(skip(self))]
    async fn toggle_status(&self, id: Uuid) -> StoreResult<Item> {
        self.patch_toggle(id).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let request = self.client.delete(self.url(&format!("/items/{id}")));
        let response = self.authorized(request).await?;
        self.check(response, Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStorage;
    use axum::Router;
    use axum_helpers::{JwtAuth, JwtConfig};
    use domain_items::{
        AdminConfig, Category, DeletePolicy, InMemoryItemRepository, ItemService, ItemStatus,
        auth, handlers,
    };
    use tempfile::TempDir;

    const PASSWORD: &str = "letmein";

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("remote-store-test-secret-long-enough").unwrap())
    }

    /// Serve the real items and login routes on an ephemeral port.
    async fn serve(repo: InMemoryItemRepository) -> String {
        let service = ItemService::new(repo).with_delete_policy(DeletePolicy::Strict);
        let api = Router::new()
            .nest("/items", handlers::router(service, jwt()))
            .merge(auth::router(AdminConfig::new(PASSWORD).unwrap(), jwt()));
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn remote(base_url: &str) -> (TempDir, RemoteStore) {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(LocalStorage::open(dir.path()).await.unwrap());
        (dir, RemoteStore::new(base_url, session))
    }

    fn new_item() -> NewItem {
        NewItem {
            title: "Car Keys".to_string(),
            category: Category::Other,
            location: "Parking Lot B".to_string(),
            date_found: "2024-02-01".parse().unwrap(),
            description: "Key fob with red tag".to_string(),
            image_data: None,
        }
    }

    #[tokio::test]
    async fn test_mutation_without_token_fails_before_request() {
        let (_dir, store) = remote("http://127.0.0.1:9").await;
        assert!(matches!(
            store.create(new_item()).await,
            Err(StoreError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_login_create_toggle_delete() {
        let repo = InMemoryItemRepository::new();
        let base = serve(repo.clone()).await;
        let (_dir, store) = remote(&base).await;

        store.login(PASSWORD).await.unwrap();
        let created = store.create(new_item()).await.unwrap();
        assert_eq!(created.status, ItemStatus::Unclaimed);
        assert_eq!(store.list().await.unwrap(), vec![created.clone()]);

        let toggled = store.toggle_status(created.id).await.unwrap();
        assert_eq!(toggled.status, ItemStatus::Claimed);

        store.delete(created.id).await.unwrap();
        assert!(repo.snapshot().await.is_empty());
        assert!(matches!(
            store.delete(created.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let base = serve(InMemoryItemRepository::new()).await;
        let (_dir, store) = remote(&base).await;

        assert!(matches!(
            store.login("wrong").await,
            Err(StoreError::InvalidCredentials)
        ));
        assert_eq!(store.session().token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_token_clears_session() {
        let base = serve(InMemoryItemRepository::new()).await;
        let (_dir, store) = remote(&base).await;
        store.session().log_in("not-a-real-token").await.unwrap();

        assert!(matches!(
            store.create(new_item()).await,
            Err(StoreError::Unauthorized)
        ));
        assert_eq!(store.session().token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_claim_is_unsupported_remotely() {
        let (_dir, store) = remote("http://127.0.0.1:9").await;
        let claimer = Claimer {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            details: "Red tag on the fob".to_string(),
        };
        assert!(matches!(
            store.claim(Uuid::now_v7(), claimer).await,
            Err(StoreError::Unsupported(_))
        ));
    }
}
