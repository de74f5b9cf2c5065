//! JWT configuration loaded through [`FromEnv`].

use core_config::{ConfigError, FromEnv, env_or_default, env_required};
use std::time::Duration;

/// Minimum accepted length of the HMAC signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Credential validity window used when `TOKEN_TTL_SECS` is unset (8 hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 8 * 60 * 60;

/// JWT authentication configuration.
///
/// Environment variables:
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `TOKEN_TTL_SECS` (optional, default 28800)
///
/// ```ignore
/// use axum_helpers::JwtConfig;
/// use core_config::FromEnv;
///
/// let config = JwtConfig::from_env()?;
/// let config = JwtConfig::new("my-super-secret-key-that-is-at-least-32-chars")?;
/// ```
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
}

impl JwtConfig {
    /// Build a config with the default TTL, rejecting short secrets.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret(&secret)?;
        Ok(Self {
            secret,
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
        })
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

fn check_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        let ttl_raw = env_or_default("TOKEN_TTL_SECS", &DEFAULT_TOKEN_TTL_SECS.to_string());
        let ttl_secs: u64 = ttl_raw.parse().map_err(|e| ConfigError::ParseError {
            key: "TOKEN_TTL_SECS".to_string(),
            details: format!("{e}"),
        })?;

        Ok(Self::new(secret)?.with_token_ttl(Duration::from_secs(ttl_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_new_valid() {
        let config = JwtConfig::new(SECRET).unwrap();
        assert_eq!(config.secret, SECRET);
        assert_eq!(config.token_ttl, Duration::from_secs(28_800));
    }

    #[test]
    fn test_new_too_short() {
        let err = JwtConfig::new("short").unwrap_err();
        assert!(err.to_string().contains("32 characters"));
    }

    #[test]
    fn test_from_env_valid() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("TOKEN_TTL_SECS", Some("60"))],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.token_ttl, Duration::from_secs(60));
            },
        );
    }

    #[test]
    fn test_from_env_missing() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_from_env_bad_ttl() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("TOKEN_TTL_SECS", Some("soon"))],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("TOKEN_TTL_SECS"));
            },
        );
    }
}
