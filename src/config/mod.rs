//! Configuration loading and validation.
//!
//! Sources are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then the `SERVER_PORT` and `GEMINI_API_KEY` environment
//! variables.

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `server.port`.
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";

/// Environment variable holding the Gemini API key.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to render config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Assistant (Gemini) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Base URL of the Generative Language API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Only ever read from the environment; never written back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout(),
            api_key: None,
        }
    }
}

impl AssistantConfig {
    /// Key present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// File names of the three datasets inside the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_ticketing")]
    pub ticketing: String,

    #[serde(default = "default_crm")]
    pub crm: String,

    #[serde(default = "default_sponsorship")]
    pub sponsorship: String,
}

fn default_ticketing() -> String {
    "ticketing.csv".to_string()
}

fn default_crm() -> String {
    "crm.csv".to_string()
}

fn default_sponsorship() -> String {
    "sponsorship.csv".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            ticketing: default_ticketing(),
            crm: default_crm(),
            sponsorship: default_sponsorship(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub datasets: DatasetConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            datasets: DatasetConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl AppConfig {
    /// Effective configuration as TOML. The API key is never written out.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Defaults, then `path` if it exists, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an injectable environment lookup.
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let config: AppConfig = builder
            .set_override_option("server.port", env(ENV_SERVER_PORT))?
            .set_override_option("assistant.api_key", env(ENV_GEMINI_API_KEY))?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assistant.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Assistant timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        for (name, file) in [
            ("ticketing", &self.datasets.ticketing),
            ("crm", &self.datasets.crm),
            ("sponsorship", &self.datasets.sponsorship),
        ] {
            if file.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Dataset file name for {name} must not be empty"
                )));
            }
        }

        Ok(())
    }
}
