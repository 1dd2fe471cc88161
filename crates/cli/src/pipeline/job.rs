//! Hunt job - builds a hunter from a loaded configuration and runs it.

use std::path::PathBuf;

use contracts::HuntConfig;
use hunter::{HuntResult, Hunter};
use record_source::MemorySource;
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// Job configuration
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Validated hunt configuration
    pub hunt: HuntConfig,

    /// JSON fixture file holding the record tables
    pub data_path: PathBuf,

    /// Page size override (None = use the configuration)
    pub chunk_size: Option<usize>,

    /// Stop after this many records reached the main stage (None = unlimited)
    pub limit: Option<u64>,
}

/// A single hunt over a fixture file
pub struct HuntJob {
    config: JobConfig,
}

impl HuntJob {
    pub fn new(config: JobConfig) -> Self {
        Self { config }
    }

    /// Load the fixtures and run the hunt to completion
    pub async fn run(&self) -> Result<HuntResult> {
        let data_path = &self.config.data_path;
        let source = MemorySource::from_json_path(data_path)
            .map_err(|e| CliError::data(data_path.display().to_string(), e))?;

        debug!(
            source = %data_path.display(),
            records = source.len(&self.config.hunt.target),
            "Fixtures loaded"
        );

        let mut hunter = Hunter::from_config(&source, &self.config.hunt)?;
        if let Some(size) = self.config.chunk_size {
            hunter = hunter.chunk(size)?;
        }

        let limit = self.config.limit;
        let mut reached = 0u64;
        let mut hunter = hunter.then(move |ctx| {
            reached += 1;
            info!(
                record_id = %ctx.record_id(),
                fields = %contracts::Value::Object(ctx.record().fields().clone()),
                "Matched record"
            );
            if let Some(limit) = limit.filter(|limit| reached >= *limit) {
                ctx.stop(format!("limit of {limit} records reached"));
            }
            Ok(())
        });

        let result = hunter.hunt().await?;

        let metrics = source.metrics().snapshot();
        debug!(
            count_queries = metrics.count_queries,
            pages_fetched = metrics.pages_fetched,
            records_fetched = metrics.records_fetched,
            "Source statistics"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{LoggingConfig, Predicate};

    const FIXTURES: &str = r#"{
        "User": [
            { "id": 1, "active": false },
            { "id": 2, "active": true },
            { "id": 3, "active": false },
            { "id": 4, "active": false }
        ]
    }"#;

    fn job(dir: &tempfile::TempDir, limit: Option<u64>) -> HuntJob {
        let data_path = dir.path().join("records.json");
        std::fs::write(&data_path, FIXTURES).unwrap();

        HuntJob::new(JobConfig {
            hunt: HuntConfig {
                target: "User".into(),
                chunk_size: 250,
                predicate: Predicate::eq("active", false),
                logging: LoggingConfig::default(),
            },
            data_path,
            chunk_size: Some(2),
            limit,
        })
    }

    #[tokio::test]
    async fn test_run_all_matches() {
        let dir = tempfile::tempdir().unwrap();
        let result = job(&dir, None).run().await.unwrap();

        assert_eq!(result.total(), 3);
        assert_eq!(result.successful(), 3);
    }

    #[tokio::test]
    async fn test_limit_stops_hunt() {
        let dir = tempfile::tempdir().unwrap();
        let result = job(&dir, Some(2)).run().await.unwrap();

        assert_eq!(result.successful(), 2);
        assert_eq!(result.skipped(), 1);
        assert_eq!(result.stop_reason(), Some("limit of 2 records reached"));
    }

    #[tokio::test]
    async fn test_missing_target_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = job(&dir, None);
        job.config.hunt.target = "Order".into();

        let err = job.run().await.unwrap_err();
        assert!(matches!(err, CliError::Hunt(_)));
    }
}
