//! Shared application state handed to the route builders.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares the underlying pool)
    pub mongo_client: Client,
    pub db: Database,
    /// Signs and verifies admin bearer tokens
    pub auth: JwtAuth,
}

impl AppState {
    pub fn new(config: crate::config::Config, mongo_client: Client, db: Database) -> Self {
        let auth = JwtAuth::new(&config.jwt);
        Self {
            config,
            mongo_client,
            db,
            auth,
        }
    }
}
