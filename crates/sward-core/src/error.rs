//! Error types for Sward

use thiserror::Error;

/// The main error type for Sward operations
#[derive(Debug, Error)]
pub enum SwardError {
    #[error("Scene node not found: {0}")]
    NodeNotFound(String),

    #[error("Heightmap error: {0}")]
    HeightmapError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Result type alias for Sward operations
pub type Result<T> = std::result::Result<T, SwardError>;

impl From<toml::de::Error> for SwardError {
    fn from(err: toml::de::Error) -> Self {
        SwardError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for SwardError {
    fn from(err: toml::ser::Error) -> Self {
        SwardError::TomlSerError(err.to_string())
    }
}
