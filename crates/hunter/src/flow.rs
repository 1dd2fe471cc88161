//! Per-run flow control state.
//!
//! Skip flags are reset before each record; the stop flag is sticky for the
//! rest of the run.

use std::collections::HashMap;

use contracts::RecordId;
use observability::RecordOutcome;

use crate::result::HuntResult;

/// Skip / stop / fail flags consulted by the runner between stages
#[derive(Debug, Default)]
pub(crate) struct FlowControl {
    skip_current: bool,
    skip_reason: Option<String>,
    /// Current record already counted as skipped via an explicit record skip
    skip_counted: bool,
    /// Current record marked failed via `fail`
    failed_current: bool,
    stop: bool,
    stop_reason: Option<String>,
}

impl FlowControl {
    /// Clear per-record flags
    pub(crate) fn reset_record(&mut self) {
        self.skip_current = false;
        self.skip_reason = None;
        self.skip_counted = false;
        self.failed_current = false;
    }

    pub(crate) fn should_skip(&self) -> bool {
        self.skip_current
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stop
    }

    /// Whether no further callback may run for the current record
    pub(crate) fn halted(&self) -> bool {
        self.skip_current || self.stop
    }

    pub(crate) fn is_failed(&self) -> bool {
        self.failed_current
    }

    pub(crate) fn skip_counted(&self) -> bool {
        self.skip_counted
    }

    pub(crate) fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    pub(crate) fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }
}

/// Everything a single run mutates: flow flags and the result aggregate
#[derive(Debug, Default)]
pub(crate) struct RunState {
    pub(crate) flow: FlowControl,
    pub(crate) result: HuntResult,
    /// Records other than the current one already counted by a skip or fail
    resolved: HashMap<RecordId, RecordOutcome>,
}

impl RunState {
    pub(crate) fn new(total: u64) -> Self {
        Self {
            flow: FlowControl::default(),
            result: HuntResult::with_total(total),
            resolved: HashMap::new(),
        }
    }

    /// Outcome recorded for `id` before the run reached it
    pub(crate) fn take_resolved(&mut self, id: &RecordId) -> Option<RecordOutcome> {
        self.resolved.remove(id)
    }

    /// Skip the current record; when `record` is given it is counted right away
    pub(crate) fn skip(
        &mut self,
        current: &RecordId,
        record: Option<&RecordId>,
        reason: Option<String>,
    ) {
        let reason = reason.filter(|r| !is_blank(r));
        self.flow.skip_current = true;
        self.flow.skip_reason = reason.clone();

        let Some(id) = record else {
            return;
        };
        if id == current {
            if self.flow.skip_counted || self.flow.failed_current {
                return;
            }
            self.flow.skip_counted = true;
        } else if self.resolved.contains_key(id) {
            return;
        } else {
            self.resolved.insert(id.clone(), RecordOutcome::Skipped);
        }
        self.result.record_skip(id.clone());
        if let Some(reason) = reason {
            self.result.record_skip_reason(id.clone(), reason);
        }
    }

    /// Stop the run after the current record
    pub(crate) fn stop(&mut self, reason: Option<String>) {
        let reason = reason.filter(|r| !is_blank(r));
        self.flow.stop = true;
        self.flow.stop_reason = reason.clone();
        if let Some(reason) = reason {
            self.result.set_stop_reason(reason);
        }
    }

    /// Count `record` as failed and halt the current record
    pub(crate) fn fail(&mut self, current: &RecordId, record: &RecordId, reason: String) {
        self.flow.skip_current = true;
        if record == current {
            if self.flow.failed_current || self.flow.skip_counted {
                return;
            }
            self.flow.failed_current = true;
        } else if self.resolved.contains_key(record) {
            return;
        } else {
            self.resolved.insert(record.clone(), RecordOutcome::Failed);
        }
        self.result.record_failure(record.clone(), reason);
    }
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
