//! Client config load/save for `~/.medai/config.yaml`.
//! Sections: `api.*` (backend location) and `chat.*` (request and display defaults).

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MODE: &str = "auto";
pub const DEFAULT_MAX_IMAGES: usize = 24;

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "MEDAI_CONFIG";

/// API section (base_url, timeout_secs).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ApiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Chat section (mode, max_images, save_images_dir).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ChatSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_images: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_images_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub chat: ChatSection,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn mode(&self) -> &str {
        self.chat.mode.as_deref().unwrap_or(DEFAULT_MODE)
    }

    pub fn max_images(&self) -> usize {
        self.chat.max_images.unwrap_or(DEFAULT_MAX_IMAGES)
    }
}

/// Returns the default config file path: `~/.medai/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".medai").join("config.yaml"))
}

/// Where a config file path came from. Only the default location may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Default(p) => p,
        }
    }
}

/// Resolve the config path: `--config` flag, then `MEDAI_CONFIG`, then the default path.
pub fn resolve_config_path(flag: Option<&Path>) -> Result<ConfigSource, ConfigError> {
    if let Some(p) = flag {
        return Ok(ConfigSource::Explicit(p.to_path_buf()));
    }
    if let Some(val) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Ok(ConfigSource::Explicit(PathBuf::from(val)));
    }
    default_config_path()
        .map(ConfigSource::Default)
        .ok_or(ConfigError::NoHome)
}

/// Load config from `source`. A missing default file yields `Config::default()`.
pub fn load_from(source: &ConfigSource) -> Result<Config, ConfigError> {
    match source {
        ConfigSource::Default(p) if !p.exists() => {
            tracing::debug!(path = %p.display(), "no config file, using defaults");
            Ok(Config::default())
        }
        _ => load(source.path()),
    }
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let io_err = |e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let contents = serde_yaml::to_string(config).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, contents).map_err(io_err)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to determine config path (set --config or MEDAI_CONFIG)")]
    NoHome,

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
