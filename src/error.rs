//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for curalink operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned by a [`KeyValueStore`](crate::store::KeyValueStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O failed for key '{key}' at {}: {source}", path.display())]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key cannot be used as a storage name.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    /// A stored value could not be encoded as JSON.
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Error returned when a backend API call fails.
///
/// Read paths never surface this to callers; they degrade to mock data.
/// Write paths (profile mirroring, meeting requests) return it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The client was configured to stay offline.
    #[error("backend disabled (offline mode)")]
    Offline,
    /// The request could not be sent or the body could not be decoded.
    #[error("API request failed for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    #[error("API error for {endpoint}: {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },
}

/// Error returned when loading configuration fails.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
