use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Admin account ensured at startup; skipped when empty.
    pub bootstrap_admin_username: String,
    pub bootstrap_admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub images_dir: PathBuf,
    /// Maximum size of a single uploaded photo, in bytes.
    pub max_image_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScorecardConfig {
    /// Chat-completions endpoint of the image-generation gateway.
    pub gateway_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub scorecard: ScorecardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.bootstrap_admin_username", "")?
            .set_default("auth.bootstrap_admin_password", "")?
            .set_default("storage.images_dir", "./data/images")?
            .set_default("storage.max_image_size", 8i64 * 1024 * 1024)?
            .set_default(
                "scorecard.gateway_url",
                "https://ai.gateway.lovable.dev/v1/chat/completions",
            )?
            .set_default("scorecard.api_key", "")?
            .set_default("scorecard.model", "google/gemini-2.5-flash-image-preview")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., RANGER__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("RANGER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
