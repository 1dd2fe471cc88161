//! HuntConfig - Config Loader output
//!
//! Describes a complete hunt: target record type, predicate, paging and logging.

use serde::{Deserialize, Serialize};

use crate::Predicate;

/// Default number of records fetched per page
pub const DEFAULT_CHUNK_SIZE: usize = 250;

/// Default context tag attached to failure logs
pub const DEFAULT_LOG_CONTEXT: &str = "hunter";

/// Complete hunt configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuntConfig {
    /// Record type to hunt (table / model name)
    pub target: String,

    /// Records fetched per page
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Initial filter
    pub predicate: Predicate,

    /// Failure logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

/// Structured logging of per-record failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit an error log entry for every failed record
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// Context tag attached to every entry
    #[serde(default = "default_log_context")]
    pub context: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            context: default_log_context(),
        }
    }
}

fn default_logging_enabled() -> bool {
    true
}

fn default_log_context() -> String {
    DEFAULT_LOG_CONTEXT.to_string()
}
