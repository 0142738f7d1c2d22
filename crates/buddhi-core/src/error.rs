use thiserror::Error;

/// Top-level error type for the Buddhimatta service.
///
/// Subsystem crates define their own error types and convert into
/// `BuddhiError` where they cross crate boundaries, so `?` works throughout.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuddhiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BuddhiError {
    fn from(err: toml::de::Error) -> Self {
        BuddhiError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BuddhiError {
    fn from(err: serde_json::Error) -> Self {
        BuddhiError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Buddhimatta operations.
pub type Result<T> = std::result::Result<T, BuddhiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuddhiError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = BuddhiError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "Storage error: disk full");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BuddhiError = io_err.into();
        assert!(matches!(err, BuddhiError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: BuddhiError = json_err.into();
        assert!(matches!(err, BuddhiError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: BuddhiError = toml_err.into();
        assert!(matches!(err, BuddhiError::Config(_)));
    }
}
