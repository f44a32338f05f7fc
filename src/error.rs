use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for the field-filter library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A raw include/exclude path could not be parsed.
    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath {
        /// The offending raw path token
        path: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// The walk descended deeper than the configured limit.
    #[error("Maximum depth of {limit} exceeded at '{path}'")]
    MaxDepthExceeded {
        /// Configured depth limit
        limit: usize,
        /// Traversal path where the limit was hit
        path: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a depth limit error.
    #[must_use]
    pub fn max_depth(limit: usize, path: impl Into<String>) -> Self {
        Self::MaxDepthExceeded {
            limit,
            path: path.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this is a path syntax error.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns true if this is a depth limit error.
    #[must_use]
    pub const fn is_max_depth(&self) -> bool {
        matches!(self, Self::MaxDepthExceeded { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
