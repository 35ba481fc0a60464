//! Error types for hexchroma-core

use thiserror::Error;

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hexchroma-core
#[derive(Error, Debug)]
pub enum Error {
    /// Color input errors (rejected at the boundary)
    #[error("Color error: {0}")]
    Color(#[from] ColorError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Runtime errors (server startup, signal handling, join failures)
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Rejections of a raw color parameter.
///
/// Both variants are client errors. The color math never sees a value that
/// produced one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The color value was absent or empty
    #[error("the \"hex\" parameter is required (e.g. FF5733)")]
    MissingParameter,

    /// The value is not 3 or 6 hexadecimal digits
    #[error("\"{value}\" is not a valid HEX color ({reason}); expected 3 or 6 hex digits")]
    InvalidFormat { value: String, reason: &'static str },
}

impl ColorError {
    /// Stable machine-readable code used in the response envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter => "missing_parameter",
            Self::InvalidFormat { .. } => "invalid_format",
        }
    }

    /// HTTP status the adapter answers with.
    #[must_use]
    pub fn status(&self) -> u16 {
        400
    }

    /// One-line hint for human-facing output.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::MissingParameter => "Pass a color, e.g. ?hex=FF5733 or ?hex=%23F00.",
            Self::InvalidFormat { .. } => {
                "Use 3 or 6 digits from 0-9/A-F, optionally prefixed with '#'."
            }
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    ParseFailed { path: String, message: String },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
