//! RecordSource trait - paged record source abstraction
//!
//! Decouples the hunt pipeline from any particular query engine. The pipeline
//! only needs to build a filtered query, count it, and fetch it page by page.

use serde_json::Value;

use crate::{HuntError, Predicate, Record};

/// Query builder produced by a record source.
///
/// Builders are owned values: every step consumes the builder and returns the
/// refined one, which lets query modifiers be plain `FnOnce(Q) -> Q` style
/// transformations.
pub trait QueryBuilder: Sized + Send + Sync {
    /// Add a filter (AND-ed with the existing ones)
    fn filter(self, predicate: &Predicate) -> Self;

    /// Order results by a column
    fn order_by(self, column: &str, descending: bool) -> Self;

    /// Cap the number of matching records
    fn limit(self, limit: usize) -> Self;

    /// Add a filter from its textual parts
    ///
    /// # Errors
    /// Returns `InvalidOperator` when the operator is not supported.
    fn where_(
        self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self, HuntError> {
        let predicate = Predicate::new(column, operator.parse()?, value);
        Ok(self.filter(&predicate))
    }
}

/// Paged record source
///
/// # Paging contract
///
/// 1. `count` and `fetch_page` are separate queries; they are not guaranteed to
///    agree if the underlying data changes between them
/// 2. Pages are 0-indexed and fully materialised before being returned
/// 3. A page shorter than `page_size` (or empty) is the last one
///
/// # Example
///
/// ```ignore
/// let query = source.query("User")?.filter(&Predicate::eq("active", false));
/// let total = source.count(&query).await?;
/// let first = source.fetch_page(&query, 0, 250).await?;
/// ```
#[trait_variant::make(RecordSource: Send)]
pub trait LocalRecordSource {
    /// Query builder type
    type Query: QueryBuilder;

    /// Source name (used for logging and errors)
    fn name(&self) -> &str;

    /// Start a query over all records of a type
    ///
    /// # Errors
    /// Returns `UnknownRecordType` when the source holds no such type.
    fn query(&self, record_type: &str) -> Result<Self::Query, HuntError>;

    /// Count records matching a query
    async fn count(&self, query: &Self::Query) -> Result<u64, HuntError>;

    /// Fetch one page of records matching a query, in enumeration order
    async fn fetch_page(
        &self,
        query: &Self::Query,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Record>, HuntError>;
}
