//! Hunter - fluent configuration and the run loop.

use std::time::Instant;

use contracts::{
    HuntConfig, HuntError, Operator, Predicate, QueryBuilder, Record, RecordSource, Value,
    DEFAULT_CHUNK_SIZE, DEFAULT_LOG_CONTEXT,
};
use observability::{record_record_outcome, record_run_finished, RecordOutcome, RunSummary};
use tracing::{debug, error, info, instrument, warn};

use crate::context::StageContext;
use crate::flow::{is_blank, RunState};
use crate::result::HuntResult;
use crate::stage::StageGroup;

/// Query modifier: refines the query before the run starts
pub type QueryModifier<'a, Q> = Box<dyn FnMut(Q) -> anyhow::Result<Q> + Send + 'a>;

/// Batch processor for records matching a predicate
///
/// A `Hunter` borrows its record source and owns the stage callbacks. `hunt`
/// takes `&mut self`, so one instance drives at most one run at a time; all
/// per-run state lives inside the run.
///
/// # Example
///
/// ```ignore
/// let result = Hunter::new(&source, "User")?
///     .find("active", false)
///     .modify_query_using(|q| Ok(q.order_by("created_at", false)))
///     .then(|ctx| {
///         mailer.send(ctx.record())?;
///         Ok(())
///     })
///     .on_error(|ctx| {
///         metrics.bounced(ctx.record_id());
///         Ok(())
///     })
///     .chunk(100)?
///     .hunt()
///     .await?;
///
/// println!("{result}");
/// ```
pub struct Hunter<'a, S: RecordSource> {
    source: &'a S,
    record_type: String,
    predicate: Option<Predicate>,
    query_modifiers: Vec<QueryModifier<'a, S::Query>>,
    before: StageGroup<'a>,
    main: StageGroup<'a>,
    after: StageGroup<'a>,
    on_success: StageGroup<'a>,
    on_error: StageGroup<'a>,
    log_errors: bool,
    log_context: String,
    chunk_size: usize,
}

impl<'a, S: RecordSource> Hunter<'a, S> {
    /// Create a hunter for one record type of a source
    ///
    /// # Errors
    /// Returns `UnknownRecordType` when the source does not hold the type.
    pub fn new(source: &'a S, record_type: impl Into<String>) -> Result<Self, HuntError> {
        let record_type = record_type.into();
        // Fail fast on unknown types
        source.query(&record_type)?;

        Ok(Self {
            source,
            record_type,
            predicate: None,
            query_modifiers: Vec::new(),
            before: StageGroup::new(),
            main: StageGroup::new(),
            after: StageGroup::new(),
            on_success: StageGroup::new(),
            on_error: StageGroup::new(),
            log_errors: true,
            log_context: DEFAULT_LOG_CONTEXT.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Create a hunter from a loaded configuration
    pub fn from_config(source: &'a S, config: &HuntConfig) -> Result<Self, HuntError> {
        let hunter = Self::new(source, config.target.as_str())?
            .find_where(config.predicate.clone())
            .chunk(config.chunk_size)?;

        Ok(if config.logging.enabled {
            hunter.with_logging(config.logging.context.as_str())
        } else {
            hunter.without_logging()
        })
    }

    /// Match records where `column = value`
    pub fn find(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.find_where(Predicate::eq(column, value))
    }

    /// Match records where `column <operator> value`
    ///
    /// # Errors
    /// Returns `InvalidOperator` when the operator is not supported.
    pub fn find_with(
        self,
        column: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self, HuntError> {
        let operator: Operator = operator.parse()?;
        Ok(self.find_where(Predicate::new(column, operator, value)))
    }

    /// Match records satisfying a predicate
    pub fn find_where(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Refine the query before iteration; an error aborts the run
    pub fn modify_query_using<F>(mut self, modifier: F) -> Self
    where
        F: FnMut(S::Query) -> anyhow::Result<S::Query> + Send + 'a,
    {
        self.query_modifiers.push(Box::new(modifier));
        self
    }

    /// Add a main stage callback
    pub fn then<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut StageContext<'_>) -> anyhow::Result<()> + Send + 'a,
    {
        self.main.push(Box::new(callback));
        self
    }

    /// Add a main stage callback only if `condition` holds now
    ///
    /// The condition is evaluated once, while the hunter is being configured.
    /// Use [`Hunter::then_when`] for a per-record condition.
    pub fn then_if<F>(self, condition: bool, callback: F) -> Self
    where
        F: FnMut(&mut StageContext<'_>) -> anyhow::Result<()> + Send + 'a,
    {
        if !condition {
            return self;
        }
        self.then(callback)
    }

    /// Add a main stage callback that runs only for records matching `condition`
    ///
    /// The condition is evaluated for every record, right before the callback
    /// would run.
    pub fn then_when<C, F>(mut self, condition: C, callback: F) -> Self
    where
        C: Fn(&Record) -> bool + Send + 'a,
        F: FnMut(&mut StageContext<'_>) -> anyhow::Result<()> + Send + 'a,
    {
        self.main.push_when(Box::new(condition), Box::new(callback));
        self
    }

    /// Add a callback running before the main stage
    pub fn on_before_then<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut StageContext<'_>) -> anyhow::Result<()> + Send + 'a,
    {
        self.before.push(Box::new(callback));
        self
    }

    /// Add a callback running after the main stage
    pub fn on_after_then<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut StageContext<'_>) -> anyhow::Result<()> + Send + 'a,
    {
        self.after.push(Box::new(callback));
        self
    }

    /// Add a callback running once a record went through every stage
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut StageContext<'_>) -> anyhow::Result<()> + Send + 'a,
    {
        self.on_success.push(Box::new(callback));
        self
    }

    /// Add a callback running when a stage raised an error
    ///
    /// The raised error is available through [`StageContext::error`].
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut StageContext<'_>) -> anyhow::Result<()> + Send + 'a,
    {
        self.on_error.push(Box::new(callback));
        self
    }

    /// Log record failures under a context tag
    pub fn with_logging(mut self, context: impl Into<String>) -> Self {
        self.log_errors = true;
        self.log_context = context.into();
        self
    }

    /// Do not log record failures
    pub fn without_logging(mut self) -> Self {
        self.log_errors = false;
        self
    }

    /// Set the page size
    ///
    /// # Errors
    /// Returns `InvalidChunkSize` for zero.
    pub fn chunk(mut self, size: usize) -> Result<Self, HuntError> {
        if size == 0 {
            return Err(HuntError::InvalidChunkSize { size });
        }
        self.chunk_size = size;
        Ok(self)
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn log_context(&self) -> &str {
        &self.log_context
    }

    pub fn logs_errors(&self) -> bool {
        self.log_errors
    }

    /// Run the pipeline over every matching record
    ///
    /// Records are processed one at a time, in the order the source pages
    /// them. Per-record errors are recorded in the result; only configuration
    /// and source errors are returned.
    #[instrument(
        name = "hunter_hunt",
        skip(self),
        fields(source = %self.source.name(), record_type = %self.record_type, context = %self.log_context)
    )]
    pub async fn hunt(&mut self) -> Result<HuntResult, HuntError> {
        let started = Instant::now();
        let query = self.build_query()?;

        let total = self.source.count(&query).await?;
        let mut state = RunState::new(total);

        if total == 0 {
            debug!("no matching records");
            return Ok(self.finish(state, started));
        }

        info!(total, chunk_size = self.chunk_size, "hunt started");

        let mut page = 0usize;
        loop {
            let records = self
                .source
                .fetch_page(&query, page, self.chunk_size)
                .await?;
            debug!(page, len = records.len(), "processing page");

            for record in &records {
                let outcome = self.process_record(record, &mut state);
                record_record_outcome(&self.log_context, outcome);
            }

            if records.len() < self.chunk_size {
                break;
            }
            page += 1;
        }

        Ok(self.finish(state, started))
    }

    fn build_query(&mut self) -> Result<S::Query, HuntError> {
        let predicate = self.predicate.as_ref().ok_or_else(|| {
            HuntError::config_validation("predicate", "no predicate set, call find() first")
        })?;

        let mut query = self.source.query(&self.record_type)?.filter(predicate);
        for (index, modifier) in self.query_modifiers.iter_mut().enumerate() {
            query = modifier(query).map_err(|e| HuntError::QueryModifier {
                index,
                message: e.to_string(),
            })?;
        }
        Ok(query)
    }

    fn process_record(&mut self, record: &Record, state: &mut RunState) -> RecordOutcome {
        state.flow.reset_record();

        // Counted when another record skipped or failed it
        if let Some(outcome) = state.take_resolved(record.id()) {
            debug!(record_id = %record.id(), %outcome, "record already resolved");
            return outcome;
        }

        if state.flow.is_stopped() {
            let id = record.id().clone();
            state.result.record_skip(id.clone());
            if let Some(reason) = state.flow.stop_reason() {
                let reason = format!("Stopped: {reason}");
                state.result.record_skip_reason(id, reason);
            }
            return RecordOutcome::Stopped;
        }

        match self.run_stages(record, state) {
            Ok(outcome) => outcome,
            Err(err) => self.handle_error(record, err, state),
        }
    }

    fn run_stages(
        &mut self,
        record: &Record,
        state: &mut RunState,
    ) -> anyhow::Result<RecordOutcome> {
        for group in [&mut self.before, &mut self.main, &mut self.after] {
            group.run(record, None, state)?;
            if state.flow.should_skip() {
                return Ok(resolve_skip(record, state));
            }
        }

        self.on_success.run(record, None, state)?;
        if state.flow.should_skip() {
            return Ok(resolve_skip(record, state));
        }
        state.result.record_success();
        Ok(RecordOutcome::Succeeded)
    }

    fn handle_error(
        &mut self,
        record: &Record,
        err: anyhow::Error,
        state: &mut RunState,
    ) -> RecordOutcome {
        // Already resolved through flow control before the error was raised
        if state.flow.should_skip() {
            return resolve_skip(record, state);
        }

        let id = record.id();
        let message = err.to_string();
        state.result.record_failure(id.clone(), message.clone());

        if self.log_errors {
            error!(
                context = %self.log_context,
                record_type = %record.record_type(),
                record_id = %id,
                error = %message,
                trace = ?err,
                "Hunter error in {}",
                self.log_context
            );
        }

        if let Err(callback_err) = self.on_error.run(record, Some(&err), state) {
            warn!(
                context = %self.log_context,
                record_id = %id,
                error = %callback_err,
                "error callback failed"
            );
        }

        RecordOutcome::Failed
    }

    fn finish(&self, mut state: RunState, started: Instant) -> HuntResult {
        let elapsed = started.elapsed();
        state.result.set_execution_time(elapsed);

        let result = state.result;
        record_run_finished(
            &self.log_context,
            &RunSummary {
                total: result.total(),
                successful: result.successful(),
                failed: result.failed(),
                skipped: result.skipped(),
                duration: elapsed,
                stopped: state.flow.is_stopped(),
            },
        );
        info!(
            total = result.total(),
            successful = result.successful(),
            failed = result.failed(),
            skipped = result.skipped(),
            stop_reason = ?result.stop_reason(),
            duration_secs = elapsed.as_secs_f64(),
            "hunt finished"
        );
        result
    }
}

/// Settle a record halted by flow control
fn resolve_skip(record: &Record, state: &mut RunState) -> RecordOutcome {
    if state.flow.is_failed() {
        return RecordOutcome::Failed;
    }

    let id = record.id();
    if !state.flow.skip_counted() {
        state.result.record_skip(id.clone());
    }
    if let Some(reason) = state.flow.skip_reason().filter(|r| !is_blank(r)) {
        let reason = reason.to_string();
        state.result.record_skip_reason(id.clone(), reason);
    }
    RecordOutcome::Skipped
}

/// Start configuring a hunter for a record type
pub fn hunt_for<'a, S: RecordSource>(
    source: &'a S,
    record_type: impl Into<String>,
) -> Result<Hunter<'a, S>, HuntError> {
    Hunter::new(source, record_type)
}

impl<S: RecordSource> std::fmt::Debug for Hunter<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hunter")
            .field("source", &self.source.name())
            .field("record_type", &self.record_type)
            .field("predicate", &self.predicate)
            .field("query_modifiers", &self.query_modifiers.len())
            .field("before", &self.before)
            .field("main", &self.main)
            .field("after", &self.after)
            .field("on_success", &self.on_success)
            .field("on_error", &self.on_error)
            .field("log_errors", &self.log_errors)
            .field("log_context", &self.log_context)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}
