//! `run` command implementation.

use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::pipeline::{print_summary, HuntJob, JobConfig};

/// Execute the `run` command
pub async fn run_hunt(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()));
    }
    if !args.data.exists() {
        return Err(CliError::data_not_found(args.data.display().to_string()));
    }

    let hunt = config_loader::ConfigLoader::load_from_path(&args.config)
        .map_err(|e| CliError::config(args.config.display().to_string(), e))?;

    info!(
        target = %hunt.target,
        predicate = %hunt.predicate,
        chunk_size = args.chunk.unwrap_or(hunt.chunk_size),
        limit = ?args.limit,
        "Configuration loaded"
    );

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let job = HuntJob::new(JobConfig {
        hunt,
        data_path: args.data.clone(),
        chunk_size: args.chunk,
        limit: args.limit,
    });

    let result = tokio::select! {
        result = job.run() => result?,
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, abandoning hunt");
            return Ok(());
        }
    };

    info!(
        total = result.total(),
        successful = result.successful(),
        failed = result.failed(),
        skipped = result.skipped(),
        duration_secs = result.execution_time().as_secs_f64(),
        "Hunt completed"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&result.detailed_summary())
            .map_err(anyhow::Error::from)?;
        println!("{json}");
    } else {
        print_summary(&result);
    }

    if result.has_errors() {
        return Err(CliError::RecordsFailed {
            failed: result.failed(),
            total: result.total(),
        });
    }
    Ok(())
}

/// Resolve on Ctrl+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
