//! Error types for Keystorm

use thiserror::Error;

/// The main error type for Keystorm operations
#[derive(Debug, Error)]
pub enum KeystormError {
    #[error("Invalid bone index {bone}: skeleton has {bone_count} bones")]
    InvalidBone { bone: usize, bone_count: usize },

    #[error("Skeleton error: {0}")]
    SkeletonError(String),

    #[error("Composite animation error: {0}")]
    CompositeError(String),

    #[error("Animation error: {0}")]
    AnimationError(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Keystorm operations
pub type Result<T> = std::result::Result<T, KeystormError>;

impl From<toml::de::Error> for KeystormError {
    fn from(err: toml::de::Error) -> Self {
        KeystormError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for KeystormError {
    fn from(err: toml::ser::Error) -> Self {
        KeystormError::TomlSerError(err.to_string())
    }
}
