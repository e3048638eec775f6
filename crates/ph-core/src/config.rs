//! Configuration types and loading
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Upload storage configuration
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size_bytes: usize,
    /// Allowed CORS origin; any origin when unset
    pub client_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; the in-memory store is used when unset
    pub url: Option<String>,
    pub pool_size: u32,
    pub pool_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT secret for token signing
    pub jwt_secret: String,
    /// Token expiration in seconds
    pub token_expiration_seconds: u64,
    /// Lifetime of the `token` cookie in days
    pub cookie_expiration_days: i64,
    /// Mark the `token` cookie `Secure`
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory uploaded files are written to
    pub uploads_path: String,
    /// Public URL prefix uploaded files are served under
    pub uploads_url: String,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_body_size_bytes: 12 * 1024 * 1024,
                client_url: None,
            },
            database: DatabaseConfig {
                url: None,
                pool_size: 10,
                pool_timeout_seconds: 5,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production".to_string(),
                token_expiration_seconds: 30 * 24 * 60 * 60,
                cookie_expiration_days: 30,
                cookie_secure: false,
            },
            storage: StorageConfig {
                uploads_path: "uploads".to_string(),
                uploads_url: "/uploads".to_string(),
                max_upload_size: 10 * 1024 * 1024,
            },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("Config file error: {0}")]
    FileError(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::FileError(err.to_string())
    }
}

impl AppConfig {
    /// Load defaults, then `projecthub.toml` (or `PROJECTHUB_CONFIG`) if present,
    /// then environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PROJECTHUB_CONFIG").unwrap_or_else(|_| "projecthub".to_string());
        let defaults = config::Config::try_from(&Self::default())?;

        let layered: AppConfig = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(&path).required(false))
            .build()?
            .try_deserialize()?;

        layered.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(env) = std::env::var("APP_ENV").or_else(|_| std::env::var("NODE_ENV")) {
            self.environment = Environment::parse(&env);
        }

        // Server
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{}' is not a valid port", port),
            })?;
        }
        if let Ok(url) = std::env::var("CLIENT_URL") {
            self.server.client_url = Some(url);
        }

        // Database
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.url = Some(url);
            }
        }
        if let Ok(size) = std::env::var("DATABASE_POOL_SIZE") {
            self.database.pool_size = size.parse().unwrap_or(self.database.pool_size);
        }

        // Auth
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(seconds) = std::env::var("JWT_EXPIRE_SECONDS") {
            self.auth.token_expiration_seconds = seconds.parse().map_err(|_| {
                ConfigError::InvalidValue {
                    key: "JWT_EXPIRE_SECONDS".to_string(),
                    message: format!("'{}' is not a number of seconds", seconds),
                }
            })?;
        }
        self.auth.cookie_secure = self.auth.cookie_secure || self.environment.is_production();

        // Storage
        if let Ok(path) = std::env::var("UPLOADS_PATH") {
            self.storage.uploads_path = path;
        }

        Ok(self)
    }

    /// Get the server address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::SocketAddr;
        let ip: std::net::IpAddr = self.server.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(ip, self.server.port)
    }
}
