use axum::Router;

use crate::state::AppState;

/// `POST /login`
pub fn router(state: &AppState) -> Router {
    domain_items::auth::router(state.config.admin.clone(), state.auth.clone())
}
