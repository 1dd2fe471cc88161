//! Record - a row yielded by a record source

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::{HuntError, RecordId, RecordKey};

/// Column holding the primary key in raw JSON rows.
pub const PRIMARY_KEY_FIELD: &str = "id";

/// A record with a stable identifier and arbitrary named fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Structured identifier
    id: RecordId,

    /// Named field values (the primary key is kept under `id`)
    fields: Map<String, Value>,
}

impl Record {
    /// Create a record, storing the key under the primary key field as well.
    pub fn new(
        record_type: impl Into<Arc<str>>,
        key: impl Into<RecordKey>,
        mut fields: Map<String, Value>,
    ) -> Self {
        let id = RecordId::new(record_type, key);
        fields.insert(PRIMARY_KEY_FIELD.to_string(), id.key().to_json());
        Self { id, fields }
    }

    /// Build a record from a JSON object containing an `id` field.
    ///
    /// # Errors
    /// - Value is not an object
    /// - `id` missing or not an integer/string
    pub fn from_json(record_type: &str, value: Value) -> Result<Self, HuntError> {
        let Value::Object(fields) = value else {
            return Err(HuntError::invalid_record(
                record_type,
                "record must be a JSON object",
            ));
        };

        let key = fields
            .get(PRIMARY_KEY_FIELD)
            .and_then(RecordKey::from_json)
            .ok_or_else(|| {
                HuntError::invalid_record(
                    record_type,
                    "missing or invalid primary key field 'id'",
                )
            })?;

        Ok(Self {
            id: RecordId::new(record_type, key),
            fields,
        })
    }

    /// Record identifier
    #[inline]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Record type tag
    #[inline]
    pub fn record_type(&self) -> &str {
        self.id.record_type()
    }

    /// Primary key
    #[inline]
    pub fn key(&self) -> &RecordKey {
        self.id.key()
    }

    /// Field value by column name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// All fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Set a field value; the primary key field cannot be overwritten.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> bool {
        let column = column.into();
        if column == PRIMARY_KEY_FIELD {
            return false;
        }
        self.fields.insert(column, value.into());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let record = Record::from_json("User", json!({ "id": 3, "email": "a@b.c" })).unwrap();
        assert_eq!(record.id(), &RecordId::new("User", 3));
        assert_eq!(record.get("email"), Some(&json!("a@b.c")));
        assert_eq!(record.get("id"), Some(&json!(3)));
    }

    #[test]
    fn test_from_json_missing_key() {
        let err = Record::from_json("User", json!({ "email": "a@b.c" })).unwrap_err();
        assert!(matches!(err, HuntError::InvalidRecord { .. }));

        let err = Record::from_json("User", json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn test_new_stores_key_field() {
        let record = Record::new("Post", "p-1", Map::new());
        assert_eq!(record.get("id"), Some(&json!("p-1")));
    }

    #[test]
    fn test_set_protects_primary_key() {
        let mut record = Record::new("Post", 1, Map::new());
        assert!(!record.set("id", 99));
        assert!(record.set("title", "hello"));
        assert_eq!(record.get("id"), Some(&json!(1)));
        assert_eq!(record.get("title"), Some(&json!("hello")));
    }
}
