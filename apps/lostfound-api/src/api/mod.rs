//! API routes, nested under /api by `axum_helpers::create_router`.

pub mod auth;
pub mod health;
pub mod items;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/items", items::router(state))
        .merge(auth::router(state))
        .merge(health::router(state.clone()))
}
