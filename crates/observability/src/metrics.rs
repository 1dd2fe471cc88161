//! Hunt run metrics
//!
//! Counters and histograms emitted through the `metrics` facade. Without an
//! installed recorder every call is a no-op.

use std::fmt;
use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// How a single record left the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOutcome {
    /// Went through every stage
    Succeeded,
    /// A stage raised an error or failed the record
    Failed,
    /// Skipped by a stage
    Skipped,
    /// Skipped because the run was stopped earlier
    Stopped,
}

impl RecordOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RecordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Figures reported once a run is over
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub skipped: u64,
    pub duration: Duration,
    pub stopped: bool,
}

/// Count one record outcome
///
/// # Example
///
/// ```ignore
/// use observability::metrics::{record_record_outcome, RecordOutcome};
///
/// record_record_outcome("nightly-cleanup", RecordOutcome::Skipped);
/// ```
pub fn record_record_outcome(context: &str, outcome: RecordOutcome) {
    counter!(
        "hunter_records_total",
        "context" => context.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record the end of a run
pub fn record_run_finished(context: &str, summary: &RunSummary) {
    let context = context.to_string();

    counter!("hunter_runs_total", "context" => context.clone()).increment(1);
    if summary.stopped {
        counter!("hunter_runs_stopped_total", "context" => context.clone()).increment(1);
    }

    histogram!("hunter_run_duration_seconds", "context" => context.clone())
        .record(summary.duration.as_secs_f64());
    gauge!("hunter_last_run_total", "context" => context.clone()).set(summary.total as f64);
    gauge!("hunter_last_run_failed", "context" => context).set(summary.failed as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(RecordOutcome::Succeeded.as_str(), "succeeded");
        assert_eq!(RecordOutcome::Stopped.to_string(), "stopped");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_record_outcome("test", RecordOutcome::Failed);
        record_run_finished(
            "test",
            &RunSummary {
                total: 3,
                successful: 2,
                failed: 1,
                duration: Duration::from_millis(5),
                ..Default::default()
            },
        );
    }
}
