//! Runtime configuration loaded from an optional TOML file.
//!
//! Lookup order for the file: an explicit path, then `$CURALINK_CONFIG`, then
//! `<config_dir>/curalink/config.toml`. A missing default file is not an
//! error; every field has a default. `$CURALINK_API_URL` overrides the API
//! base URL after the file is read.

use crate::error::ConfigError;
use crate::matching::Weights;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

const CONFIG_ENV: &str = "CURALINK_CONFIG";
const API_URL_ENV: &str = "CURALINK_API_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend HTTP API.
    pub api_base_url: String,
    /// Per-request timeout for backend calls.
    pub request_timeout_secs: u64,
    /// Directory holding the local state files. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    /// Never contact the backend; serve mock data only.
    pub offline: bool,
    /// Scorer weight overrides.
    pub weights: Weights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 10,
            data_dir: None,
            offline: false,
            weights: Weights::default(),
        }
    }
}

impl Config {
    /// Load configuration, applying environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            // A path the user named must exist
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            config.api_base_url = url;
        }
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();

        Ok(config)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory for persisted local state.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(expand_tilde(&dir.to_string_lossy()).as_ref()),
            None => dirs::data_dir()
                .map(|dir| dir.join("curalink"))
                .unwrap_or_else(|| PathBuf::from(".curalink")),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("curalink").join("config.toml"))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
