use common::image_job::IMAGE_PROCESSING_QUEUE;
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
pub struct StorageConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Maximum accepted image size in bytes.
    #[serde(default = "default_max_image_size")]
    pub max_image_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_size: default_max_image_size(),
        }
    }
}

fn default_max_image_size() -> usize {
    5 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct MqAppConfig {
    #[serde(default = "default_mq_enabled")]
    pub enabled: bool,
    #[serde(default = "default_mq_url")]
    pub url: String,
    #[serde(default = "default_mq_pool_size")]
    pub pool_size: u8,
    #[serde(default = "default_image_queue_name")]
    pub image_queue_name: String,
}

impl Default for MqAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_mq_enabled(),
            url: default_mq_url(),
            pool_size: default_mq_pool_size(),
            image_queue_name: default_image_queue_name(),
        }
    }
}

fn default_mq_enabled() -> bool {
    true
}

fn default_mq_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_mq_pool_size() -> u8 {
    5
}

fn default_image_queue_name() -> String {
    IMAGE_PROCESSING_QUEUE.to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    /// Directory holding development data to load at startup. Seeding is
    /// skipped when unset.
    #[serde(default)]
    pub dev_data_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub mq: MqAppConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.region", "us-east-1")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SUMMITSTORE__DATABASE__URL)
            .add_source(Environment::with_prefix("SUMMITSTORE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
