//! Stage groups and their executor.

use contracts::Record;

use crate::context::StageContext;
use crate::flow::RunState;

/// Stage callback
///
/// Returning an error fails the record; the runner catches it.
pub type StageFn<'a> =
    Box<dyn FnMut(&mut StageContext<'_>) -> anyhow::Result<()> + Send + 'a>;

/// Condition evaluated against each record just before a conditional stage runs
pub type RecordCondition<'a> = Box<dyn Fn(&Record) -> bool + Send + 'a>;

struct Stage<'a> {
    callback: StageFn<'a>,
    condition: Option<RecordCondition<'a>>,
}

/// Ordered callbacks executed for one hook point
///
/// Insertion order is execution order.
#[derive(Default)]
pub struct StageGroup<'a> {
    stages: Vec<Stage<'a>>,
}

impl<'a> StageGroup<'a> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a callback
    pub fn push(&mut self, callback: StageFn<'a>) {
        self.stages.push(Stage {
            callback,
            condition: None,
        });
    }

    /// Append a callback that only runs for records satisfying `condition`
    pub fn push_when(&mut self, condition: RecordCondition<'a>, callback: StageFn<'a>) {
        self.stages.push(Stage {
            callback,
            condition: Some(condition),
        });
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every callback in order against `record`
    ///
    /// Stops silently as soon as the record is skipped/failed or the run is
    /// stopped. Callback errors are returned as-is.
    pub(crate) fn run(
        &mut self,
        record: &Record,
        error: Option<&anyhow::Error>,
        state: &mut RunState,
    ) -> anyhow::Result<()> {
        for stage in &mut self.stages {
            if state.flow.halted() {
                break;
            }
            if let Some(condition) = &stage.condition {
                if !condition(record) {
                    continue;
                }
            }
            let mut ctx = StageContext::new(record, error, state);
            (stage.callback)(&mut ctx)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for StageGroup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageGroup")
            .field("stages", &self.stages.len())
            .finish()
    }
}
