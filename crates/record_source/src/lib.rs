//! # Record Source
//!
//! In-memory implementation of the `RecordSource` contract.
//!
//! Responsibilities:
//! - Hold named tables of records
//! - Evaluate predicates (`=`, `!=`, `<`, `<=`, `>`, `>=`, `like`, `not like`)
//! - Count and page through filtered, ordered results
//! - Track query/page metrics for tests and diagnostics
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::{Predicate, QueryBuilder, RecordSource};
//! use record_source::MemorySource;
//!
//! let source = MemorySource::from_json_str("fixtures", r#"{ "User": [{ "id": 1, "active": false }] }"#)?;
//! let query = source.query("User")?.filter(&Predicate::eq("active", false));
//! assert_eq!(source.count(&query).await?, 1);
//! ```

mod eval;
mod memory;
mod metrics;
mod query;

// Re-exports
pub use contracts::{QueryBuilder, Record, RecordSource};
pub use eval::matches;
pub use memory::MemorySource;
pub use metrics::{SourceMetrics, SourceMetricsSnapshot};
pub use query::MemoryQuery;
