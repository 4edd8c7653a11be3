//! Error types for presskit-core.
//!
//! The gesture state machine itself never fails; these errors only arise
//! when configuration is read from or written to files.

use thiserror::Error;

/// Errors that can occur while loading or saving a [`GestureConfiguration`].
///
/// [`GestureConfiguration`]: crate::GestureConfiguration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse or serialize error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// TOML parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialize error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// File extension is not one we know how to parse.
    #[error("Unsupported configuration format: {0:?}")]
    UnsupportedFormat(String),

    /// A field holds a value that cannot be used.
    #[error("Invalid value for '{field}': {message}")]
    Invalid {
        /// Field name
        field: String,
        /// Error message
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ConfigError = io_err.into();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_config_error_invalid_display() {
        let err = ConfigError::invalid("long_press_delay", "must be non-negative");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'long_press_delay': must be non-negative"
        );
    }

    #[test]
    fn test_config_error_unsupported_format() {
        let err = ConfigError::UnsupportedFormat("ini".to_string());
        assert_eq!(err.to_string(), "Unsupported configuration format: \"ini\"");
    }
}
