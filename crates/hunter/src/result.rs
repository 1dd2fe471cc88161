//! Run result aggregate.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use contracts::RecordId;
use serde::Serialize;

/// Statistics from a hunt run
///
/// Populated by the runner and by flow-control calls made from stage
/// callbacks; read-only once `hunt` returns.
#[derive(Debug, Clone, Default)]
pub struct HuntResult {
    total: u64,
    successful: u64,
    failed: u64,
    skipped: u64,
    errors: BTreeMap<RecordId, String>,
    skipped_records: Vec<RecordId>,
    skip_reasons: BTreeMap<RecordId, String>,
    stop_reason: Option<String>,
    execution_time: Duration,
}

impl HuntResult {
    pub(crate) fn with_total(total: u64) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub(crate) fn record_success(&mut self) {
        self.successful += 1;
    }

    pub(crate) fn record_failure(&mut self, id: RecordId, message: String) {
        self.failed += 1;
        self.errors.insert(id, message);
    }

    pub(crate) fn record_skip(&mut self, id: RecordId) {
        self.skipped += 1;
        self.skipped_records.push(id);
    }

    pub(crate) fn record_skip_reason(&mut self, id: RecordId, reason: String) {
        self.skip_reasons.insert(id, reason);
    }

    pub(crate) fn set_stop_reason(&mut self, reason: String) {
        self.stop_reason = Some(reason);
    }

    pub(crate) fn set_execution_time(&mut self, elapsed: Duration) {
        self.execution_time = elapsed;
    }

    /// Records matching the query when the run started
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn successful(&self) -> u64 {
        self.successful
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Error message per failed record
    pub fn errors(&self) -> &BTreeMap<RecordId, String> {
        &self.errors
    }

    /// Error message of one record
    pub fn error(&self, id: &RecordId) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    /// Skipped records, in the order they were skipped
    pub fn skipped_records(&self) -> &[RecordId] {
        &self.skipped_records
    }

    pub fn skip_reasons(&self) -> &BTreeMap<RecordId, String> {
        &self.skip_reasons
    }

    pub fn skip_reason(&self, id: &RecordId) -> Option<&str> {
        self.skip_reasons.get(id).map(String::as_str)
    }

    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }

    /// Wall-clock duration of the run
    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    pub fn has_errors(&self) -> bool {
        self.failed > 0
    }

    pub fn has_skipped(&self) -> bool {
        self.skipped > 0
    }

    pub fn has_skip_reasons(&self) -> bool {
        !self.skip_reasons.is_empty()
    }

    /// Whether a stage stopped the run with a reason
    pub fn was_stopped(&self) -> bool {
        self.stop_reason.is_some()
    }

    /// Successful records as a percentage of the total
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.successful as f64 / self.total as f64) * 100.0
    }

    /// Records that ran to an outcome other than skipped
    pub fn processed_count(&self) -> u64 {
        self.successful + self.failed
    }

    /// Number of records per distinct skip reason
    pub fn skip_reason_counts(&self) -> BTreeMap<&str, u64> {
        let mut counts = BTreeMap::new();
        for reason in self.skip_reasons.values() {
            *counts.entry(reason.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Serializable snapshot of every statistic
    pub fn detailed_summary(&self) -> DetailedSummary {
        DetailedSummary {
            total: self.total,
            successful: self.successful,
            failed: self.failed,
            skipped: self.skipped,
            errors: self.errors.clone(),
            skipped_records: self.skipped_records.clone(),
            skip_reasons: self.skip_reasons.clone(),
            stop_reason: self.stop_reason.clone(),
            success_rate: self.success_rate(),
            processed_count: self.processed_count(),
            execution_time: self.execution_time.as_secs_f64(),
        }
    }
}

impl fmt::Display for HuntResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}, Successful: {}, Failed: {}, Skipped: {}",
            self.total, self.successful, self.failed, self.skipped
        )?;
        if let Some(reason) = &self.stop_reason {
            write!(f, " (Stopped: {reason})")?;
        }
        Ok(())
    }
}

/// Detailed summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedSummary {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub skipped: u64,
    pub errors: BTreeMap<RecordId, String>,
    pub skipped_records: Vec<RecordId>,
    pub skip_reasons: BTreeMap<RecordId, String>,
    pub stop_reason: Option<String>,
    pub success_rate: f64,
    pub processed_count: u64,
    /// Seconds
    pub execution_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HuntResult {
        let mut result = HuntResult::with_total(4);
        result.record_success();
        result.record_failure(RecordId::new("User", 2), "boom".into());
        result.record_skip(RecordId::new("User", 3));
        result.record_skip_reason(RecordId::new("User", 3), "duplicate".into());
        result.record_skip(RecordId::new("User", 4));
        result.record_skip_reason(RecordId::new("User", 4), "duplicate".into());
        result
    }

    #[test]
    fn test_empty_result() {
        let result = HuntResult::default();
        assert_eq!(result.success_rate(), 0.0);
        assert!(!result.has_errors());
        assert!(!result.has_skipped());
        assert!(!result.was_stopped());
        assert_eq!(
            result.summary(),
            "Total: 0, Successful: 0, Failed: 0, Skipped: 0"
        );
    }

    #[test]
    fn test_rates_and_counts() {
        let result = sample();
        assert_eq!(result.success_rate(), 25.0);
        assert_eq!(result.processed_count(), 2);
        assert!(result.has_errors());
        assert!(result.has_skip_reasons());
        assert_eq!(result.error(&RecordId::new("User", 2)), Some("boom"));
        assert_eq!(result.skip_reason_counts().get("duplicate"), Some(&2));
    }

    #[test]
    fn test_summary_with_stop_reason() {
        let mut result = sample();
        result.set_stop_reason("quota".into());
        assert!(result.was_stopped());
        assert_eq!(
            result.summary(),
            "Total: 4, Successful: 1, Failed: 1, Skipped: 2 (Stopped: quota)"
        );
    }

    #[test]
    fn test_detailed_summary_serializes_ids_as_keys() {
        let json = serde_json::to_value(sample().detailed_summary()).unwrap();
        assert_eq!(json["errors"]["User#2"], "boom");
        assert_eq!(json["skipped_records"][0], "User#3");
        assert_eq!(json["skip_reasons"]["User#4"], "duplicate");
        assert_eq!(json["processed_count"], 2);
        assert!(json["stop_reason"].is_null());
    }
}
