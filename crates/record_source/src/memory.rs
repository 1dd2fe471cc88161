//! MemorySource - in-memory record tables
//!
//! Tables live behind a `RwLock` so stage callbacks holding a shared reference
//! can update or delete records while a hunt pages through them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use contracts::{HuntError, Record, RecordId, RecordSource};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::metrics::SourceMetrics;
use crate::query::MemoryQuery;

type Tables = HashMap<String, Vec<Record>>;

/// In-memory record source
#[derive(Debug)]
pub struct MemorySource {
    name: String,
    tables: RwLock<Tables>,
    metrics: Arc<SourceMetrics>,
    /// Page index whose fetch fails (fault injection)
    failing_page: Option<usize>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: RwLock::new(HashMap::new()),
            metrics: Arc::new(SourceMetrics::new()),
            failing_page: None,
        }
    }

    /// Add (or extend) a table; the table exists even when `records` is empty
    pub fn with_table(self, record_type: impl Into<String>, records: Vec<Record>) -> Self {
        let record_type = record_type.into();
        if let Ok(mut tables) = self.tables.write() {
            tables.entry(record_type).or_default().extend(records);
        }
        self
    }

    /// Make the fetch of the given page fail with a source error
    pub fn fail_on_page(mut self, page: usize) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Load tables from JSON: `{ "<type>": [ { "id": .., ... }, ... ] }`
    ///
    /// # Errors
    /// - Invalid JSON
    /// - Top level is not an object of arrays
    /// - A row has no valid `id`
    pub fn from_json_str(name: impl Into<String>, content: &str) -> Result<Self, HuntError> {
        let root: Value = serde_json::from_str(content).map_err(|e| HuntError::ConfigParse {
            message: format!("JSON parse error: {e}"),
            source: Some(Box::new(e)),
        })?;

        let Value::Object(tables) = root else {
            return Err(HuntError::config_parse(
                "record fixtures must be an object keyed by record type",
            ));
        };

        let mut source = Self::new(name);
        for (record_type, rows) in tables {
            let Value::Array(rows) = rows else {
                return Err(HuntError::config_parse(format!(
                    "records for type '{record_type}' must be an array"
                )));
            };
            let records = rows
                .into_iter()
                .map(|row| Record::from_json(&record_type, row))
                .collect::<Result<Vec<_>, _>>()?;
            debug!(record_type = %record_type, count = records.len(), "loaded table");
            source = source.with_table(record_type, records);
        }
        Ok(source)
    }

    /// Load tables from a JSON file, named after the file
    pub fn from_json_path(path: &Path) -> Result<Self, HuntError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(path.display().to_string(), &content)
    }

    /// Insert a record into the table of its type
    pub fn insert(&self, record: Record) -> Result<(), HuntError> {
        let mut tables = self.write()?;
        tables
            .entry(record.record_type().to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    /// Set a field on a stored record, returns whether the record exists
    pub fn update(
        &self,
        id: &RecordId,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<bool, HuntError> {
        let mut tables = self.write()?;
        let record = tables
            .get_mut(id.record_type())
            .and_then(|table| table.iter_mut().find(|r| r.id() == id));
        Ok(match record {
            Some(record) => record.set(column, value),
            None => false,
        })
    }

    /// Delete a stored record, returns whether it existed
    pub fn delete(&self, id: &RecordId) -> Result<bool, HuntError> {
        let mut tables = self.write()?;
        let Some(table) = tables.get_mut(id.record_type()) else {
            return Ok(false);
        };
        let before = table.len();
        table.retain(|r| r.id() != id);
        Ok(table.len() != before)
    }

    /// Look up a stored record
    pub fn get(&self, id: &RecordId) -> Result<Option<Record>, HuntError> {
        let tables = self.read()?;
        Ok(tables
            .get(id.record_type())
            .and_then(|table| table.iter().find(|r| r.id() == id))
            .cloned())
    }

    /// Number of stored records of a type
    pub fn len(&self, record_type: &str) -> usize {
        self.read()
            .map(|tables| tables.get(record_type).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Whether the source holds no record at all
    pub fn is_empty(&self) -> bool {
        self.read()
            .map(|tables| tables.values().all(Vec::is_empty))
            .unwrap_or(true)
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<SourceMetrics> {
        self.metrics.clone()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, HuntError> {
        self.tables
            .read()
            .map_err(|_| HuntError::source(format!("source '{}' lock poisoned", self.name)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, HuntError> {
        self.tables
            .write()
            .map_err(|_| HuntError::source(format!("source '{}' lock poisoned", self.name)))
    }

    fn select(&self, query: &MemoryQuery) -> Result<Vec<Record>, HuntError> {
        let tables = self.read()?;
        let table = tables.get(query.record_type()).ok_or_else(|| {
            HuntError::unknown_record_type(query.record_type(), self.name.as_str())
        })?;
        Ok(query.select(table).into_iter().cloned().collect())
    }
}

impl RecordSource for MemorySource {
    type Query = MemoryQuery;

    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self, record_type: &str) -> Result<MemoryQuery, HuntError> {
        let tables = self.read()?;
        if !tables.contains_key(record_type) {
            return Err(HuntError::unknown_record_type(
                record_type,
                self.name.as_str(),
            ));
        }
        Ok(MemoryQuery::new(record_type))
    }

    #[instrument(
        name = "memory_source_count",
        skip(self, query),
        fields(source = %self.name, record_type = %query.record_type())
    )]
    async fn count(&self, query: &MemoryQuery) -> Result<u64, HuntError> {
        self.metrics.record_count();
        let count = self.select(query)?.len() as u64;
        trace!(count, "counted records");
        Ok(count)
    }

    #[instrument(
        name = "memory_source_fetch_page",
        skip(self, query),
        fields(source = %self.name, record_type = %query.record_type())
    )]
    async fn fetch_page(
        &self,
        query: &MemoryQuery,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Record>, HuntError> {
        if page_size == 0 {
            return Err(HuntError::InvalidChunkSize { size: page_size });
        }
        if self.failing_page == Some(page) {
            return Err(HuntError::source(format!(
                "source '{}' failed to fetch page {page}",
                self.name
            )));
        }

        let records: Vec<Record> = self
            .select(query)?
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .collect();

        self.metrics.record_page(records.len());
        trace!(len = records.len(), "fetched page");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Predicate, QueryBuilder};
    use serde_json::json;

    const FIXTURES: &str = r#"{
        "User": [
            { "id": 1, "active": true },
            { "id": 2, "active": false },
            { "id": 3, "active": false }
        ],
        "Post": []
    }"#;

    #[test]
    fn test_from_json_str() {
        let source = MemorySource::from_json_str("fixtures", FIXTURES).unwrap();
        assert_eq!(source.len("User"), 3);
        assert_eq!(source.len("Post"), 0);
        assert!(source.query("Post").is_ok());
    }

    #[test]
    fn test_from_json_str_rejects_bad_shape() {
        assert!(MemorySource::from_json_str("x", "[]").is_err());
        assert!(MemorySource::from_json_str("x", r#"{ "User": {} }"#).is_err());
        let err = MemorySource::from_json_str("x", r#"{ "User": [{ "name": "no id" }] }"#)
            .unwrap_err();
        assert!(matches!(err, HuntError::InvalidRecord { .. }));
    }

    #[test]
    fn test_from_json_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, FIXTURES).unwrap();

        let source = MemorySource::from_json_path(&path).unwrap();
        assert_eq!(source.len("User"), 3);
    }

    #[test]
    fn test_unknown_record_type() {
        let source = MemorySource::from_json_str("fixtures", FIXTURES).unwrap();
        let err = source.query("Ghost").unwrap_err();
        assert!(matches!(err, HuntError::UnknownRecordType { .. }));
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_count_and_pages() {
        let source = MemorySource::from_json_str("fixtures", FIXTURES).unwrap();
        let query = source
            .query("User")
            .unwrap()
            .filter(&Predicate::eq("active", false));

        assert_eq!(source.count(&query).await.unwrap(), 2);

        let first = source.fetch_page(&query, 0, 1).await.unwrap();
        let second = source.fetch_page(&query, 1, 1).await.unwrap();
        let third = source.fetch_page(&query, 2, 1).await.unwrap();
        assert_eq!(first[0].id(), &RecordId::new("User", 2));
        assert_eq!(second[0].id(), &RecordId::new("User", 3));
        assert!(third.is_empty());

        let snap = source.metrics().snapshot();
        assert_eq!(snap.count_queries, 1);
        assert_eq!(snap.page_sizes, vec![1, 1, 0]);
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let source = MemorySource::from_json_str("fixtures", FIXTURES).unwrap();
        let query = source.query("User").unwrap();
        let err = source.fetch_page(&query, 0, 0).await.unwrap_err();
        assert!(matches!(err, HuntError::InvalidChunkSize { size: 0 }));
    }

    #[tokio::test]
    async fn test_failing_page() {
        let source = MemorySource::from_json_str("fixtures", FIXTURES)
            .unwrap()
            .fail_on_page(1);
        let query = source.query("User").unwrap();
        assert!(source.fetch_page(&query, 0, 2).await.is_ok());
        let err = source.fetch_page(&query, 1, 2).await.unwrap_err();
        assert!(matches!(err, HuntError::Source { .. }));
    }

    #[test]
    fn test_update_and_delete() {
        let source = MemorySource::from_json_str("fixtures", FIXTURES).unwrap();
        let id = RecordId::new("User", 2);

        assert!(source.update(&id, "active", true).unwrap());
        let stored = source.get(&id).unwrap().unwrap();
        assert_eq!(stored.get("active"), Some(&json!(true)));

        assert!(source.delete(&id).unwrap());
        assert!(!source.delete(&id).unwrap());
        assert_eq!(source.len("User"), 2);
        assert!(!source
            .update(&RecordId::new("Ghost", 1), "x", 1)
            .unwrap());
    }

    #[test]
    fn test_insert() {
        let source = MemorySource::new("empty");
        assert!(source.is_empty());
        source
            .insert(Record::from_json("Tag", json!({ "id": "rust" })).unwrap())
            .unwrap();
        assert_eq!(source.len("Tag"), 1);
        assert!(!source.is_empty());
    }
}
