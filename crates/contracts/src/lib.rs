//! # Contracts
//!
//! Frozen interface contracts shared by every hunter crate: record identity,
//! predicates, the record source abstraction, run configuration and errors.
//! Business crates depend on this crate only, reverse dependencies are prohibited.
//!
//! ## Record Model
//! - A record is identified by a structured `(record_type, key)` pair
//! - Fields are arbitrary JSON scalars, addressed by column name

mod config;
mod error;
mod predicate;
mod record;
mod record_id;
mod source;

pub use config::*;
pub use error::*;
pub use predicate::{Operator, Predicate};
pub use record::Record;
pub use record_id::{RecordId, RecordKey};
pub use source::{LocalRecordSource, QueryBuilder, RecordSource};

/// Re-exported so callers can build predicate values without a direct dependency.
pub use serde_json::{json, Map, Value};
