use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Where unauthenticated callers are redirected.
    pub login_url: String,
    pub session_ttl_days: i64,
}

impl Config {
    /// Load configuration from `config.toml` (optional) with `APP__`-prefixed
    /// environment overrides, e.g. `APP__DATABASE__URL`.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.base_url", "http://localhost:3000")?
            .set_default("database.url", "sqlite:./campus-board.db")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.login_url", "/auth/login")?
            .set_default("auth.session_ttl_days", 30)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
