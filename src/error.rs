use std::fmt;
use std::io;

/// Error type used across the application
#[derive(Debug)]
pub enum MaintlyticsError {
    /// File I/O error
    Io(io::Error),
    /// JSON parse error for a persisted document
    JsonParse {
        key: String,
        source: serde_json::Error,
    },
    /// Storage backend failure
    Storage { key: String, message: String },
    /// Configuration error
    Config { message: String },
    /// Input validation error
    Validation { field: String, message: String },
}

impl fmt::Display for MaintlyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintlyticsError::Io(err) => write!(f, "I/O error: {}", err),
            MaintlyticsError::JsonParse { key, source } => {
                write!(f, "JSON parse error for '{}': {}", key, source)
            }
            MaintlyticsError::Storage { key, message } => {
                write!(f, "Storage error for '{}': {}", key, message)
            }
            MaintlyticsError::Config { message } => write!(f, "Configuration error: {}", message),
            MaintlyticsError::Validation { field, message } => {
                write!(f, "Validation error in field '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for MaintlyticsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaintlyticsError::Io(err) => Some(err),
            MaintlyticsError::JsonParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for MaintlyticsError {
    fn from(err: io::Error) -> Self {
        MaintlyticsError::Io(err)
    }
}

impl From<serde_json::Error> for MaintlyticsError {
    fn from(err: serde_json::Error) -> Self {
        MaintlyticsError::JsonParse {
            key: "unknown".to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for MaintlyticsError {
    fn from(err: serde_yaml::Error) -> Self {
        MaintlyticsError::Config {
            message: err.to_string(),
        }
    }
}

/// Result type used across the application
pub type Result<T> = std::result::Result<T, MaintlyticsError>;

/// Helper constructors
impl MaintlyticsError {
    pub fn storage_error(key: &str, message: &str) -> Self {
        Self::Storage {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn config_error(message: &str) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    pub fn validation_error(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
