//! Items Domain
//!
//! Found-item listings: models, validation, filtering, storage and the
//! HTTP surface for the public board and the admin moderation view.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (list is public, mutations need a token)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation, delete policy
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB and in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_items::{handlers, mongodb::MongoItemRepository, service::ItemService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("lostfound");
//!
//! let repository = MongoItemRepository::new(db);
//! repository.init_indexes().await?;
//! let service = ItemService::new(repository);
//!
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-chars")?);
//! let router = handlers::router(service, auth);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod validation;

pub use auth::{AdminConfig, AuthApiDoc, LoginRequest, TokenResponse};
pub use error::{ItemError, ItemResult};
pub use filter::{FilterCriteria, ResultsSummary, SortKey, apply_filters};
pub use handlers::ApiDoc;
pub use memory::InMemoryItemRepository;
pub use models::{
    Category, ClaimRequest, Claimer, CreateItem, ImageData, Item, ItemList, ItemStatus, NewItem,
    PatchItem,
};
pub use self::mongodb::MongoItemRepository;
pub use repository::ItemRepository;
pub use service::{DeletePolicy, ItemService};
pub use validation::FieldErrors;
