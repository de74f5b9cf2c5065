use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch},
};
use axum_helpers::{
    JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, PayloadTooLargeResponse, UnauthorizedResponse,
    },
    require_admin,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ItemResult;
use crate::models::{Category, Claimer, CreateItem, Item, ItemList, ItemStatus, PatchItem};
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, update_item, delete_item),
    components(
        schemas(Item, ItemList, CreateItem, PatchItem, Category, ItemStatus, Claimer),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            PayloadTooLargeResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Found item listings")
    )
)]
pub struct ApiDoc;

/// Items router. Listing is public; every mutation requires an admin
/// bearer token.
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new().route("/", get(list_items));

    let protected = Router::new()
        .route("/", axum::routing::post(create_item))
        .route("/{id}", patch(update_item).delete(delete_item))
        .route_layer(from_fn_with_state(auth, require_admin));

    public.merge(protected).with_state(shared_service)
}

/// List every item, newest `dateFound` first
#[utoipa::path(
    get,
    path = "",
    tag = "Items",
    responses(
        (status = 200, description = "All items", body = ItemList),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
) -> ItemResult<Json<ItemList>> {
    let items = service.list_items().await?;
    Ok(Json(ItemList { items }))
}

/// Add a found item
#[utoipa::path(
    post,
    path = "",
    tag = "Items",
    request_body = CreateItem,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateItem>,
) -> ItemResult<impl IntoResponse> {
    let item = service.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Toggle an item between claimed and unclaimed
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = PatchItem,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated item", body = Item),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    UuidPath(id): UuidPath,
    Json(patch): Json<PatchItem>,
) -> ItemResult<Json<Item>> {
    let item = service.update_item(id, patch).await?;
    Ok(Json(item))
}

/// Delete an item
///
/// Unknown ids return 204 unless strict delete is configured.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    UuidPath(id): UuidPath,
) -> ItemResult<impl IntoResponse> {
    service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryItemRepository;
    use crate::models::NewItem;
    use crate::service::DeletePolicy;
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use axum_helpers::JwtConfig;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("handler-test-secret-at-least-32-chars").unwrap())
    }

    fn seeded() -> (InMemoryItemRepository, Item, Item) {
        let older = Item::new(NewItem {
            title: "Geometry Notebook".into(),
            category: Category::Academic,
            location: "Bus #12".into(),
            date_found: "2024-01-03".parse().unwrap(),
            description: "Graph-ruled".into(),
            image_data: None,
        });
        let newer = Item::new(NewItem {
            title: "AirPods Case".into(),
            category: Category::Electronics,
            location: "Gym bleachers".into(),
            date_found: "2024-01-09".parse().unwrap(),
            description: "White case".into(),
            image_data: None,
        });
        let repo = InMemoryItemRepository::with_items(vec![older.clone(), newer.clone()]);
        (repo, older, newer)
    }

    fn app(repo: InMemoryItemRepository, policy: DeletePolicy) -> Router {
        router(ItemService::new(repo).with_delete_policy(policy), jwt())
    }

    fn bearer() -> String {
        format!("Bearer {}", jwt().issue_admin_token().unwrap())
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        auth: Option<String>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_list_is_public_and_newest_first() {
        let (repo, older, newer) = seeded();
        let (status, body) = send(app(repo, DeletePolicy::Lenient), "GET", "/", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["_id"], newer.id.to_string());
        assert_eq!(items[1]["_id"], older.id.to_string());
    }

    #[tokio::test]
    async fn test_create_requires_token() {
        let (repo, _, _) = seeded();
        let body = serde_json::json!({"title": "Scarf"});
        let (status, _) = send(app(repo.clone(), DeletePolicy::Lenient), "POST", "/", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(repo.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_with_token() {
        let (repo, _, _) = seeded();
        let body = serde_json::json!({
            "title": "Black Scarf",
            "category": "Clothing",
            "location": "Auditorium",
            "dateFound": "2024-01-06",
            "description": "Soft knit scarf",
            "imageData": "data:image/png;base64,AQID"
        });
        let (status, created) = send(
            app(repo.clone(), DeletePolicy::Lenient),
            "POST",
            "/",
            Some(bearer()),
            Some(body),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "unclaimed");
        assert_eq!(created["imageData"], "data:image/png;base64,AQID");
        assert!(created["createdAt"].is_string());
        assert_eq!(repo.snapshot().await.len(), 3);
    }

    #[tokio::test]
    async fn test_create_missing_fields_is_bad_request() {
        let (repo, _, _) = seeded();
        let body = serde_json::json!({"title": "Scarf", "category": "Clothing"});
        let (status, error) = send(
            app(repo.clone(), DeletePolicy::Lenient),
            "POST",
            "/",
            Some(bearer()),
            Some(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "VALIDATION_ERROR");
        assert!(error["details"].get("location").is_some());
        assert_eq!(repo.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_blank_category_and_date_is_bad_request() {
        let (repo, _, _) = seeded();
        let body = serde_json::json!({
            "title": "Scarf",
            "category": "",
            "location": "Gym",
            "dateFound": "",
            "description": "knit"
        });
        let (status, error) = send(
            app(repo.clone(), DeletePolicy::Lenient),
            "POST",
            "/",
            Some(bearer()),
            Some(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "VALIDATION_ERROR");
        assert_eq!(error["details"]["category"][0]["message"], "Required");
        assert_eq!(error["details"]["dateFound"][0]["message"], "Required");
        assert!(error["details"].get("date_found").is_none());
        assert_eq!(repo.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_patch_toggles_status() {
        let (repo, older, _) = seeded();
        let (status, item) = send(
            app(repo, DeletePolicy::Lenient),
            "PATCH",
            &format!("/{}", older.id),
            Some(bearer()),
            Some(serde_json::json!({"toggleStatus": true})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["status"], "claimed");
    }

    #[tokio::test]
    async fn test_patch_unknown_id_is_not_found() {
        let (repo, _, _) = seeded();
        let (status, _) = send(
            app(repo, DeletePolicy::Lenient),
            "PATCH",
            &format!("/{}", Uuid::now_v7()),
            Some(bearer()),
            Some(serde_json::json!({"toggleStatus": true})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_existing_item() {
        let (repo, older, _) = seeded();
        let (status, _) = send(
            app(repo.clone(), DeletePolicy::Lenient),
            "DELETE",
            &format!("/{}", older.id),
            Some(bearer()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(repo.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_depends_on_policy() {
        let (repo, _, _) = seeded();
        let uri = format!("/{}", Uuid::now_v7());

        let (lenient, _) = send(app(repo.clone(), DeletePolicy::Lenient), "DELETE", &uri, Some(bearer()), None).await;
        assert_eq!(lenient, StatusCode::NO_CONTENT);

        let (strict, _) = send(app(repo, DeletePolicy::Strict), "DELETE", &uri, Some(bearer()), None).await;
        assert_eq!(strict, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_with_tampered_token_is_unauthorized() {
        let (repo, older, _) = seeded();
        let token = format!("{}x", bearer());
        let (status, _) = send(
            app(repo.clone(), DeletePolicy::Lenient),
            "DELETE",
            &format!("/{}", older.id),
            Some(token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(repo.snapshot().await.len(), 2);
    }
}
