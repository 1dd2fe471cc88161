//! Error types for CLI operations.

use contracts::HuntError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Fixture file not found
    #[error("Data file not found: {path}")]
    DataNotFound { path: String },

    /// Configuration could not be loaded or is invalid
    #[error("Invalid configuration {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: HuntError,
    },

    /// Fixture file could not be loaded
    #[error("Failed to load records from {path}: {source}")]
    Data {
        path: String,
        #[source]
        source: HuntError,
    },

    /// The hunt aborted before producing a result
    #[error("Hunt aborted: {0}")]
    Hunt(#[from] HuntError),

    /// The hunt completed, but some records failed
    #[error("{failed} of {total} records failed")]
    RecordsFailed { failed: u64, total: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn data_not_found(path: impl Into<String>) -> Self {
        Self::DataNotFound { path: path.into() }
    }

    pub fn config(path: impl Into<String>, source: HuntError) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }

    pub fn data(path: impl Into<String>, source: HuntError) -> Self {
        Self::Data {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CliError::config("hunt.toml", HuntError::InvalidChunkSize { size: 0 });
        assert!(err.to_string().starts_with("Invalid configuration hunt.toml"));

        let err = CliError::RecordsFailed {
            failed: 2,
            total: 10,
        };
        assert_eq!(err.to_string(), "2 of 10 records failed");
    }
}
