//! Predicate evaluation over JSON scalars
//!
//! Numbers compare numerically, strings lexicographically. Booleans and null
//! only support (in)equality. A missing column never matches, except that
//! `= null` / `!= null` behave like `IS NULL` / `IS NOT NULL`.

use std::cmp::Ordering;

use contracts::{Operator, Predicate, Record};
use serde_json::Value;

/// Check whether a record satisfies a predicate
pub fn matches(record: &Record, predicate: &Predicate) -> bool {
    let actual = record.get(&predicate.column);

    if predicate.value.is_null() {
        let is_null = actual.is_none_or(Value::is_null);
        return match predicate.operator {
            Operator::Eq => is_null,
            Operator::Ne => !is_null,
            _ => false,
        };
    }

    match actual {
        Some(actual) => compare(actual, predicate.operator, &predicate.value),
        None => false,
    }
}

fn compare(actual: &Value, operator: Operator, expected: &Value) -> bool {
    match operator {
        Operator::Eq => values_equal(actual, expected),
        Operator::Ne => !actual.is_null() && !values_equal(actual, expected),
        Operator::Lt => ordering(actual, expected).is_some_and(Ordering::is_lt),
        Operator::Le => ordering(actual, expected).is_some_and(Ordering::is_le),
        Operator::Gt => ordering(actual, expected).is_some_and(Ordering::is_gt),
        Operator::Ge => ordering(actual, expected).is_some_and(Ordering::is_ge),
        Operator::Like => like(actual, expected).unwrap_or(false),
        Operator::NotLike => like(actual, expected).is_some_and(|m| !m),
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => actual == expected,
    }
}

/// Ordering between two comparable scalars, `None` when incomparable
pub(crate) fn ordering(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Case-insensitive SQL `LIKE`, `None` when the operands are not textual
fn like(actual: &Value, pattern: &Value) -> Option<bool> {
    let Value::String(pattern) = pattern else {
        return None;
    };
    let text = match actual {
        Value::String(s) => s.to_lowercase(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    Some(like_match(&text, &pattern))
}

/// Wildcard match that only ever backtracks to the most recent `%`
fn like_match(text: &[char], pattern: &[char]) -> bool {
    let (mut t, mut p) = (0, 0);
    // Position after the last `%` and the text index it is currently matched up to
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                p += 1;
                star = Some((p, t));
            }
            Some(&c) if c == '_' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    p = sp;
                    t = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}
