//! # Config Loader
//!
//! Loads and validates hunt configurations.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `HuntConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("hunt.toml")).unwrap();
//! println!("Target: {}", config.target);
//! ```

mod parser;
mod validator;

pub use contracts::HuntConfig;
pub use parser::ConfigFormat;

use contracts::HuntError;
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file path
    ///
    /// The format is detected from the file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<HuntConfig, HuntError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from a string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<HuntConfig, HuntError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Validate an already built configuration
    pub fn validate(config: &HuntConfig) -> Result<(), HuntError> {
        validator::validate(config)
    }

    pub fn to_toml(config: &HuntConfig) -> Result<String, HuntError> {
        toml::to_string_pretty(config)
            .map_err(|e| HuntError::config_parse(format!("TOML serialize error: {e}")))
    }

    pub fn to_json(config: &HuntConfig) -> Result<String, HuntError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| HuntError::config_parse(format!("JSON serialize error: {e}")))
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat, HuntError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            HuntError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| HuntError::config_parse(format!("unsupported config format: .{ext}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{json, Operator};

    const HUNT_TOML: &str = r#"
target = "User"
chunk_size = 50

[predicate]
column = "last_login_days"
operator = ">"
value = 90

[logging]
context = "inactive-users"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let config = ConfigLoader::load_from_str(HUNT_TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(config.target, "User");
        assert_eq!(config.chunk_size, 50);
        assert_eq!(config.predicate.operator, Operator::Gt);
        assert_eq!(config.predicate.value, json!(90));
        assert!(config.logging.enabled);
        assert_eq!(config.logging.context, "inactive-users");
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(HUNT_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let reloaded = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config, reloaded);
    }

    #[test]
    fn test_toml_to_json() {
        let config = ConfigLoader::load_from_str(HUNT_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        assert!(json.contains("\"operator\": \">\""));
        let reloaded = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config, reloaded);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
target = "User"
chunk_size = 0

[predicate]
column = "active"
value = false
"#;
        let err = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, HuntError::InvalidChunkSize { size: 0 }));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hunt.toml");
        std::fs::write(&path, HUNT_TOML).unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.target, "User");
    }

    #[test]
    fn test_load_from_path_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            ConfigLoader::load_from_path(&missing),
            Err(HuntError::Io(_))
        ));

        let yaml = dir.path().join("hunt.yaml");
        std::fs::write(&yaml, "target: User").unwrap();
        let err = ConfigLoader::load_from_path(&yaml).unwrap_err();
        assert!(err.to_string().contains(".yaml"));
    }
}
