//! # configs
//!
//! Typed application configuration. Values layer in this order, last one
//! wins: built-in defaults, an optional `config/default.toml` file, then
//! `APP_`-prefixed environment variables (`APP_SERVER__PORT=9000`).
//!
//! Secrets ride in `SecretString` so they never end up in debug output
//! or logs.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. Unset means the in-memory backend.
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity system that issues tokens.
    pub jwt_secret: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Root directory for uploaded files.
    pub root: String,
    /// Public URL prefix the stored ids resolve under.
    pub url_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
}

/// Loads the configuration. `.env` is read first so local development
/// can keep everything in one file.
pub fn load() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let cfg = config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("database.max_connections", 5)?
        .set_default("auth.jwt_secret", "dev-secret-change-me")?
        .set_default("media.root", "./data/uploads")?
        .set_default("media.url_prefix", "/static/uploads")?
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;

    Ok(cfg.try_deserialize()?)
}
