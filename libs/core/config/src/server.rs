use crate::{env_or_default, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// Default request body limit (2 MiB), large enough for an embedded photo.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted JSON body size in bytes
    pub body_limit_bytes: usize,
    /// Optional directory served as static files for unmatched routes
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with defaults:
    /// - HOST: 0.0.0.0
    /// - PORT: 8080
    /// - BODY_LIMIT_BYTES: 2 MiB
    /// - STATIC_DIR: unset (no static file serving)
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_or_default("PORT", "8080")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "PORT".to_string(),
                details: format!("{}", e),
            })?;
        let body_limit_bytes = env_or_default(
            "BODY_LIMIT_BYTES",
            &DEFAULT_BODY_LIMIT_BYTES.to_string(),
        )
        .parse()
        .map_err(|e| ConfigError::ParseError {
            key: "BODY_LIMIT_BYTES".to_string(),
            details: format!("{}", e),
        })?;
        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            body_limit_bytes,
            static_dir,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            static_dir: None,
        }
    }
}
