use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::identity::ClientIdentity;
use crate::domain::types::{BackendUrl, DeviceType, UserName};

/// Prefix of environment variables overriding file settings, e.g.
/// `APP_BACKEND_URL`.
pub const ENV_PREFIX: &str = "APP";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_templates_dir() -> String {
    "templates/**/*".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Configuration options of the categories service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    #[validate(length(min = 1))]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Remote category endpoint; the `run` selector is appended as a query.
    pub backend_url: BackendUrl,
    pub device_type: DeviceType,
    pub username: UserName,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
    /// Cookie signing key; a random key is generated when absent.
    #[serde(default)]
    #[validate(length(min = 64))]
    pub secret_key: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),
}

impl ServerConfig {
    /// Load settings from an optional YAML file overlaid with `APP_*`
    /// environment variables.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn identity(&self) -> ClientIdentity {
        ClientIdentity::new(self.device_type.clone(), self.username.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
