//! `validate` command implementation.

use anyhow::Context;
use contracts::{HuntConfig, Operator, Value};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    target: String,
    predicate: String,
    chunk_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_context: Option<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Configuration validation failed").into())
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            error: Some(CliError::config_not_found(config_path.as_str()).to_string()),
            config_path,
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary {
                    target: config.target.clone(),
                    predicate: config.predicate.to_string(),
                    chunk_size: config.chunk_size,
                    log_context: config
                        .logging
                        .enabled
                        .then(|| config.logging.context.clone()),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Non-fatal configuration issues
fn collect_warnings(config: &HuntConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let predicate = &config.predicate;

    if !config.logging.enabled {
        warnings.push("logging is disabled - record failures will not be logged".to_string());
    }

    if matches!(predicate.operator, Operator::Like | Operator::NotLike)
        && !predicate.value.is_string()
    {
        warnings.push(format!(
            "'{}' compares against a non-string value, no record will match",
            predicate.operator
        ));
    }

    if predicate.value == Value::Null
        && !matches!(predicate.operator, Operator::Eq | Operator::Ne)
    {
        warnings.push(format!(
            "'{}' against null never matches, use '=' or '!='",
            predicate.operator
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Target: {}", summary.target);
            println!("  Predicate: {}", summary.predicate);
            println!("  Chunk size: {}", summary.chunk_size);
            if let Some(ref context) = summary.log_context {
                println!("  Log context: {context}");
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
