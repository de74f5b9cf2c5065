use super::config::JwtConfig;
use crate::errors::AppError;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Subject and role carried by every admin credential.
pub const ADMIN_SUBJECT: &str = "admin";
pub const ADMIN_ROLE: &str = "admin";

/// Claims of an admin bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(e) => AppError::InternalServerError(e.to_string()),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

/// Stateless HS256 issuer and verifier.
///
/// Only signature and expiry are checked on verification; there is no
/// revocation list.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        tracing::info!(ttl_secs = config.token_ttl.as_secs(), "JWT auth initialized");

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            token_ttl: config.token_ttl,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Issue a fresh admin token valid for the configured TTL.
    pub fn issue_admin_token(&self) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
            jti: Uuid::now_v7().to_string(),
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &AdminClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(AuthError::Signing)
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        decode::<AdminClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-that-is-at-least-32-chars!!").unwrap())
    }

    #[test]
    fn test_issue_then_verify() {
        let auth = auth();
        let token = auth.issue_admin_token().unwrap();
        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 28_800);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = auth();
        let now = Utc::now().timestamp();
        let token = auth
            .sign(&AdminClaims {
                sub: ADMIN_SUBJECT.into(),
                role: ADMIN_ROLE.into(),
                iat: now - 7_200,
                exp: now - 3_600,
                jti: Uuid::now_v7().to_string(),
            })
            .unwrap();
        assert!(matches!(auth.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = auth();
        let mut token = auth.issue_admin_token().unwrap();
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-32-chars-long").unwrap());
        let token = other.issue_admin_token().unwrap();
        assert!(auth().verify(&token).is_err());
    }
}
