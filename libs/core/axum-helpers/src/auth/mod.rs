//! Stateless bearer-token authentication for admin routes.
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, require_admin};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//! let protected = Router::new()
//!     .route("/items", post(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, require_admin));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::{DEFAULT_TOKEN_TTL_SECS, JwtConfig};
pub use jwt::{ADMIN_ROLE, ADMIN_SUBJECT, AdminClaims, AuthError, JwtAuth};
pub use middleware::{bearer_token, require_admin};
