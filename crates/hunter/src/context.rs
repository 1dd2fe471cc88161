//! StageContext - what a stage callback sees of the run

use contracts::{Record, RecordId, Value};

use crate::flow::RunState;
use crate::result::HuntResult;

/// Context handed to every stage callback
///
/// Borrows the record being processed and the state of the active run, so
/// flow-control calls can only be issued while a run is in progress.
///
/// # Example
///
/// ```ignore
/// hunter.then(|ctx| {
///     if ctx.field("email").is_none() {
///         let id = ctx.record_id().clone();
///         ctx.fail(&id, "missing email");
///         return Ok(());
///     }
///     if ctx.field("plan") == Some(&json!("lifetime")) {
///         ctx.skip("lifetime plan");
///     }
///     Ok(())
/// });
/// ```
pub struct StageContext<'r> {
    record: &'r Record,
    error: Option<&'r anyhow::Error>,
    state: &'r mut RunState,
}

impl<'r> StageContext<'r> {
    pub(crate) fn new(
        record: &'r Record,
        error: Option<&'r anyhow::Error>,
        state: &'r mut RunState,
    ) -> Self {
        Self {
            record,
            error,
            state,
        }
    }

    /// Record being processed
    pub fn record(&self) -> &Record {
        self.record
    }

    /// Identifier of the record being processed
    pub fn record_id(&self) -> &RecordId {
        self.record.id()
    }

    /// The record, if it is of the given type
    pub fn record_as(&self, record_type: &str) -> Option<&Record> {
        (self.record.record_type() == record_type).then_some(self.record)
    }

    /// Field of the record being processed
    pub fn field(&self, column: &str) -> Option<&Value> {
        self.record.get(column)
    }

    /// Error raised by an earlier stage (error callbacks only)
    pub fn error(&self) -> Option<&anyhow::Error> {
        self.error
    }

    /// Skip the current record with a reason
    ///
    /// Remaining callbacks for this record do not run. Blank reasons are not
    /// recorded.
    pub fn skip(&mut self, reason: impl Into<String>) {
        let current = self.record.id();
        self.state.skip(current, None, Some(reason.into()));
    }

    /// Skip the current record without recording a reason
    pub fn skip_without_reason(&mut self) {
        let current = self.record.id();
        self.state.skip(current, None, None);
    }

    /// Skip a specific record, counting it immediately
    ///
    /// The current record is halted as well. Passing the current record's id
    /// counts it once, however many times it is skipped.
    pub fn skip_record(&mut self, id: &RecordId, reason: impl Into<String>) {
        let current = self.record.id();
        self.state.skip(current, Some(id), Some(reason.into()));
    }

    /// Stop the run: every record after the current one is skipped
    pub fn stop(&mut self, reason: impl Into<String>) {
        self.state.stop(Some(reason.into()));
    }

    /// Stop the run without recording a reason
    pub fn stop_without_reason(&mut self) {
        self.state.stop(None);
    }

    /// Mark a record as failed and halt the current record
    pub fn fail(&mut self, id: &RecordId, reason: impl Into<String>) {
        let current = self.record.id();
        self.state.fail(current, id, reason.into());
    }

    /// Mark the current record as failed
    pub fn fail_current(&mut self, reason: impl Into<String>) {
        let current = self.record.id();
        self.state.fail(current, current, reason.into());
    }

    /// Whether the current record has been skipped or failed
    pub fn is_skipped(&self) -> bool {
        self.state.flow.should_skip()
    }

    pub fn is_stopped(&self) -> bool {
        self.state.flow.is_stopped()
    }

    /// Current skip reason of this record
    pub fn skip_reason(&self) -> Option<&str> {
        self.state.flow.skip_reason()
    }

    /// Current stop reason of the run
    pub fn stop_reason(&self) -> Option<&str> {
        self.state.flow.stop_reason()
    }

    /// Results accumulated so far
    pub fn result(&self) -> &HuntResult {
        &self.state.result
    }
}
