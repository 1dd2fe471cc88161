//! Layered error definitions
//!
//! Categorized by source: configuration / query / record source

use thiserror::Error;

/// Unified error type
///
/// Every variant is fatal to a run. Per-record callback failures never surface
/// here, they are recorded in the run result instead.
#[derive(Debug, Error)]
pub enum HuntError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Chunk size must be a positive page size
    #[error("chunk size must be greater than zero, got {size}")]
    InvalidChunkSize { size: usize },

    /// The record source does not know the requested record type
    #[error("record type '{record_type}' does not exist in source '{source_name}'")]
    UnknownRecordType {
        record_type: String,
        source_name: String,
    },

    /// Comparison operator is not supported
    #[error("unsupported comparison operator '{operator}'")]
    InvalidOperator { operator: String },

    /// A query modifier did not yield a usable query
    #[error("query modifier #{index} must return a query builder: {message}")]
    QueryModifier { index: usize, message: String },

    /// A record could not be built from raw data
    #[error("invalid record for type '{record_type}': {message}")]
    InvalidRecord {
        record_type: String,
        message: String,
    },

    // ===== Source Errors =====
    /// Count or page fetch failed in the record source
    #[error("record source error: {message}")]
    Source { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuntError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create unknown record type error
    pub fn unknown_record_type(
        record_type: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self::UnknownRecordType {
            record_type: record_type.into(),
            source_name: source_name.into(),
        }
    }

    /// Create invalid record error
    pub fn invalid_record(record_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            record_type: record_type.into(),
            message: message.into(),
        }
    }

    /// Create record source error
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    /// Whether this error was caused by how the run was configured
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse { .. }
                | Self::ConfigValidation { .. }
                | Self::InvalidChunkSize { .. }
                | Self::UnknownRecordType { .. }
                | Self::InvalidOperator { .. }
                | Self::QueryModifier { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(HuntError::InvalidChunkSize { size: 0 }.is_configuration());
        assert!(HuntError::unknown_record_type("ghost", "memory").is_configuration());
        assert!(!HuntError::source("connection reset").is_configuration());
    }

    #[test]
    fn test_error_messages() {
        let err = HuntError::QueryModifier {
            index: 1,
            message: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "query modifier #1 must return a query builder: boom"
        );
        assert_eq!(
            HuntError::InvalidChunkSize { size: 0 }.to_string(),
            "chunk size must be greater than zero, got 0"
        );
    }
}
