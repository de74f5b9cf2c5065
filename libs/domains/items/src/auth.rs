//! Shared-secret admin login issuing bearer tokens.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use axum_helpers::{
    AppError, AuthError, JwtAuth,
    errors::responses::{InternalServerErrorResponse, UnauthorizedResponse},
};
use core_config::{ConfigError, FromEnv, env_required};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::{OpenApi, ToSchema};

/// Admin credential configuration
#[derive(Clone)]
pub struct AdminConfig {
    password: Arc<str>,
}

impl AdminConfig {
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::ParseError {
                key: "ADMIN_PASSWORD".to_string(),
                details: "must not be empty".to_string(),
            });
        }
        Ok(Self {
            password: password.into(),
        })
    }

    /// Compare without short-circuiting on the first differing byte.
    pub fn verify(&self, candidate: &str) -> bool {
        let expected = self.password.as_bytes();
        let candidate = candidate.as_bytes();
        let diff = expected
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        diff == 0 && expected.len() == candidate.len()
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig").field("password", &"***").finish()
    }
}

impl FromEnv for AdminConfig {
    /// `ADMIN_PASSWORD` (required)
    fn from_env() -> Result<Self, ConfigError> {
        Self::new(env_required("ADMIN_PASSWORD")?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Clone)]
struct LoginState {
    admin: AdminConfig,
    auth: JwtAuth,
}

#[derive(OpenApi)]
#[openapi(
    paths(login),
    components(
        schemas(LoginRequest, TokenResponse),
        responses(UnauthorizedResponse, InternalServerErrorResponse)
    ),
    tags((name = "Auth", description = "Admin login"))
)]
pub struct AuthApiDoc;

/// `POST /login`
pub fn router(admin: AdminConfig, auth: JwtAuth) -> Router {
    Router::new()
        .route("/login", post(login))
        .with_state(LoginState { admin, auth })
}

/// Exchange the admin password for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip_all)]
async fn login(
    State(state): State<LoginState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(body) = payload?;

    if body.password.is_empty() || !state.admin.verify(&body.password) {
        tracing::warn!("Rejected admin login");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.auth.issue_admin_token()?;
    tracing::info!("Admin token issued");
    Ok(Json(TokenResponse { token }))
}
