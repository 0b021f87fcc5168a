//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the config file to disk.
    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema.
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to serialize config to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
}
