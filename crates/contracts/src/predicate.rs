//! Predicate - the single filter a hunt starts from

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::HuntError;

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    #[default]
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
}

impl Operator {
    /// SQL-style spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "like",
            Self::NotLike => "not like",
        }
    }
}

impl FromStr for Operator {
    type Err = HuntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_lowercase().as_str() {
            "=" | "==" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "like" => Ok(Self::Like),
            "not like" => Ok(Self::NotLike),
            _ => Err(HuntError::InvalidOperator {
                operator: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = HuntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `column <operator> value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Column name
    pub column: String,

    /// Comparison operator (defaults to `=`)
    #[serde(default)]
    pub operator: Operator,

    /// Comparison value (any JSON scalar)
    pub value: Value,
}

impl Predicate {
    /// Create a predicate with an explicit operator
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Create an equality predicate
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Operator::Eq, value)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_parse() {
        assert_eq!("=".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!("<>".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::Ge);
        assert_eq!("LIKE".parse::<Operator>().unwrap(), Operator::Like);
        assert_eq!("not   like".parse::<Operator>().unwrap(), Operator::NotLike);
    }

    #[test]
    fn test_operator_parse_invalid() {
        let err = "~=".parse::<Operator>().unwrap_err();
        assert!(matches!(err, HuntError::InvalidOperator { .. }));
    }

    #[test]
    fn test_predicate_default_operator() {
        let p: Predicate = serde_json::from_value(json!({
            "column": "status",
            "value": "active"
        }))
        .unwrap();
        assert_eq!(p.operator, Operator::Eq);
        assert_eq!(p, Predicate::eq("status", "active"));
    }

    #[test]
    fn test_predicate_rejects_bad_operator() {
        let result: Result<Predicate, _> = serde_json::from_value(json!({
            "column": "age",
            "operator": "between",
            "value": 3
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Predicate::new("age", Operator::Gt, 18).to_string(),
            "age > 18"
        );
    }
}
