//! # Hunter
//!
//! Fluent batch processing of records matching a predicate.
//!
//! A [`Hunter`] pages through the records of one type that match a predicate
//! and runs every record through ordered stage callbacks:
//!
//! ```text
//! before -> main -> after -> on_success
//!                 \-> on_error (when a stage raised an error)
//! ```
//!
//! Callbacks steer the run through their [`StageContext`]: skip the current
//! record, fail a record, or stop the whole run. Every run returns a
//! [`HuntResult`] with counts, per-record errors and skip reasons.
//!
//! ## Usage
//!
//! ```ignore
//! use hunter::Hunter;
//! use record_source::MemorySource;
//!
//! let source = MemorySource::from_json_path("users.json".as_ref())?;
//! let result = Hunter::new(&source, "User")?
//!     .find("active", false)
//!     .then(|ctx| {
//!         source.delete(ctx.record_id())?;
//!         Ok(())
//!     })
//!     .chunk(100)?
//!     .hunt()
//!     .await?;
//! ```

mod context;
mod flow;
mod hunter;
mod result;
mod stage;

pub use context::StageContext;
pub use hunter::{hunt_for, Hunter, QueryModifier};
pub use result::{DetailedSummary, HuntResult};
pub use stage::{RecordCondition, StageFn, StageGroup};
