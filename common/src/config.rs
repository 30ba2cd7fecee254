use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_DIR: &str = "panel";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Read(String),
    #[error("could not parse config file: {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub drom: Drom,
    #[serde(default)]
    pub loki: Option<Loki>,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct Drom {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Loki {
    pub url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drom: Drom::default(),
            loki: None,
            log_dir: default_log_dir(),
        }
    }
}

impl Default for Drom {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Reads the file named by `CONFIG_PATH`, falling back to `config.yaml`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".into());
        Self::load_from(path)
    }

    /// A missing file is not an error, the defaults are used instead.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(config_file) => Self::from_yaml(&config_file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Read(e.to_string())),
        }
    }

    pub fn from_yaml(config_file: &str) -> Result<Self, ConfigError> {
        if config_file.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(config_file)?)
    }
}
