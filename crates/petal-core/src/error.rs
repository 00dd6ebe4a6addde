//! Error types for Petal

use thiserror::Error;

/// The main error type for Petal operations
#[derive(Debug, Error)]
pub enum PetalError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid value type for '{name}': expected {expected}")]
    InvalidValueType { name: String, expected: String },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid enum value: {value} is not one of {allowed:?}")]
    InvalidEnumValue { value: String, allowed: Vec<String> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Import error: {0}")]
    ImportError(String),
}

/// Result type alias for Petal operations
pub type Result<T> = std::result::Result<T, PetalError>;

impl From<toml::de::Error> for PetalError {
    fn from(err: toml::de::Error) -> Self {
        PetalError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for PetalError {
    fn from(err: toml::ser::Error) -> Self {
        PetalError::TomlSerError(err.to_string())
    }
}
