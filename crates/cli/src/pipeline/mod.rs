//! Hunt job wiring: fixtures, configuration and stage callbacks.

mod job;
mod report;

pub use job::{HuntJob, JobConfig};
pub use report::print_summary;
