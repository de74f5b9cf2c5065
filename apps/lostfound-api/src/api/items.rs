//! Wires the items domain to MongoDB.

use axum::Router;
use domain_items::{ItemService, MongoItemRepository, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoItemRepository::new(state.db.clone());
    let service = ItemService::new(repository).with_delete_policy(state.config.delete_policy);

    handlers::router(service, state.auth.clone())
}
