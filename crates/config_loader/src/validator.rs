//! Config validation
//!
//! Rules:
//! - target is not blank
//! - predicate column is not blank
//! - predicate value is a scalar or null
//! - chunk_size > 0
//! - logging context is not blank while logging is enabled

use contracts::{HuntConfig, HuntError, Value};

/// Validate a HuntConfig
///
/// Returns the first error encountered.
pub fn validate(config: &HuntConfig) -> Result<(), HuntError> {
    validate_target(config)?;
    validate_predicate(config)?;
    validate_chunk_size(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_target(config: &HuntConfig) -> Result<(), HuntError> {
    if config.target.trim().is_empty() {
        return Err(HuntError::config_validation(
            "target",
            "target record type cannot be empty",
        ));
    }
    Ok(())
}

fn validate_predicate(config: &HuntConfig) -> Result<(), HuntError> {
    let predicate = &config.predicate;

    if predicate.column.trim().is_empty() {
        return Err(HuntError::config_validation(
            "predicate.column",
            "predicate column cannot be empty",
        ));
    }

    if matches!(predicate.value, Value::Array(_) | Value::Object(_)) {
        return Err(HuntError::config_validation(
            format!("predicate[{}].value", predicate.column),
            format!("value must be a scalar or null, got {}", predicate.value),
        ));
    }

    Ok(())
}

fn validate_chunk_size(config: &HuntConfig) -> Result<(), HuntError> {
    if config.chunk_size == 0 {
        return Err(HuntError::InvalidChunkSize {
            size: config.chunk_size,
        });
    }
    Ok(())
}

fn validate_logging(config: &HuntConfig) -> Result<(), HuntError> {
    if config.logging.enabled && config.logging.context.trim().is_empty() {
        return Err(HuntError::config_validation(
            "logging.context",
            "context cannot be empty while logging is enabled",
        ));
    }
    Ok(())
}
