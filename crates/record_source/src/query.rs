//! MemoryQuery - query builder for `MemorySource`

use std::cmp::Ordering;

use contracts::{Predicate, QueryBuilder, Record};

use crate::eval::{matches, ordering};

/// Ordering clause
#[derive(Debug, Clone, PartialEq)]
struct OrderClause {
    column: String,
    descending: bool,
}

/// Filtered, ordered view over one table
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryQuery {
    record_type: String,
    predicates: Vec<Predicate>,
    order: Vec<OrderClause>,
    limit: Option<usize>,
}

impl MemoryQuery {
    pub(crate) fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Target record type
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Filters applied so far
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Row cap, if any
    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// Apply filters, ordering and limit to a table
    ///
    /// Without an explicit ordering, records come back in primary key order so
    /// that offset paging is stable.
    pub(crate) fn select<'a>(&self, table: &'a [Record]) -> Vec<&'a Record> {
        let mut selected: Vec<&Record> = table
            .iter()
            .filter(|record| self.predicates.iter().all(|p| matches(record, p)))
            .collect();

        selected.sort_by(|a, b| self.compare(a, b));

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for clause in &self.order {
            let ord = match (a.get(&clause.column), b.get(&clause.column)) {
                (Some(x), Some(y)) => {
                    let ord = ordering(x, y).unwrap_or(Ordering::Equal);
                    if clause.descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                }
                // Missing values sort last in both directions
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.key().cmp(b.key())
    }
}

impl QueryBuilder for MemoryQuery {
    fn filter(mut self, predicate: &Predicate) -> Self {
        self.predicates.push(predicate.clone());
        self
    }

    fn order_by(mut self, column: &str, descending: bool) -> Self {
        self.order.push(OrderClause {
            column: column.to_string(),
            descending,
        });
        self
    }

    fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
