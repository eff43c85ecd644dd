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
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    /// Upper bound for a single uploaded file, in bytes.
    pub max_upload_size: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CountyConfig {
    /// JSON array of `{id, name, state, key}` loaded at startup.
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TextGenConfig {
    pub base_url: String,
    /// Text recommendations are disabled when unset.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub counties: CountyConfig,
    pub text_gen: TextGenConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("storage.upload_dir", "./uploads")?
            .set_default("storage.max_upload_size", 50 * 1024 * 1024)?
            .set_default("text_gen.base_url", "https://api.openai.com/v1")?
            .set_default("text_gen.model", "gpt-4o-mini")?
            .set_default("text_gen.max_tokens", 3000)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., COUNTYPOST__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("COUNTYPOST").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
