//! RecordId - Structured record identifier
//!
//! Pairs the record type tag with its primary key. Both halves use `Arc<str>`
//! where text is involved, so cloning an id into result maps is O(1).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Primary key of a record.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    /// Integer key (auto-increment style)
    Int(i64),
    /// Textual key (uuid, ulid, slug...)
    Str(Arc<str>),
}

impl RecordKey {
    /// Build a key from a JSON scalar.
    ///
    /// Only integers and strings are valid keys.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(Arc::from(s.as_str()))),
            _ => None,
        }
    }

    /// JSON form of the key, as stored in the record fields.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Str(s) => Value::from(s.as_ref()),
        }
    }
}

impl From<i64> for RecordKey {
    #[inline]
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for RecordKey {
    #[inline]
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<u32> for RecordKey {
    #[inline]
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<&str> for RecordKey {
    #[inline]
    fn from(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }
}

impl From<String> for RecordKey {
    #[inline]
    fn from(s: String) -> Self {
        Self::Str(Arc::from(s))
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl Serialize for RecordKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for RecordKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom("record key must be an integer or a string"))
    }
}

/// Record identifier: `(record_type, key)`.
///
/// Equality and hashing cover both halves, so `User#1` and `Post#1` never
/// collide even though their keys match. The display form (`user_1`) is only
/// used in logs and reports; serialization keeps the type's case (`User#1`)
/// so distinct ids never share a JSON key.
///
/// # Examples
/// ```
/// use contracts::RecordId;
///
/// let id = RecordId::new("User", 42);
/// assert_eq!(id.to_string(), "user_42");
/// assert_ne!(id, RecordId::new("Post", 42));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    record_type: Arc<str>,
    key: RecordKey,
}

impl RecordId {
    /// Create a new identifier.
    pub fn new(record_type: impl Into<Arc<str>>, key: impl Into<RecordKey>) -> Self {
        Self {
            record_type: record_type.into(),
            key: key.into(),
        }
    }

    /// Type tag of the record.
    #[inline]
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Primary key of the record.
    #[inline]
    pub fn key(&self) -> &RecordKey {
        &self.key
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.record_type.to_lowercase(), self.key)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({}#{:?})", self.record_type, self.key)
    }
}

// Serialized as a string so ids can key JSON objects
impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&format_args!("{}#{}", self.record_type, self.key))
    }
}
