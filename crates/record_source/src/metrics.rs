//! Source query metrics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Record source metrics
#[derive(Debug, Default)]
pub struct SourceMetrics {
    /// Count queries executed
    pub count_queries: AtomicU64,

    /// Page fetches executed
    pub pages_fetched: AtomicU64,

    /// Records returned across all pages
    pub records_fetched: AtomicU64,

    /// Size of every page returned, in fetch order
    page_sizes: Mutex<Vec<usize>>,
}

impl SourceMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a count query
    pub fn record_count(&self) {
        self.count_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a page fetch
    pub fn record_page(&self, len: usize) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        self.records_fetched.fetch_add(len as u64, Ordering::Relaxed);
        if let Ok(mut sizes) = self.page_sizes.lock() {
            sizes.push(len);
        }
    }

    /// Get snapshot
    pub fn snapshot(&self) -> SourceMetricsSnapshot {
        SourceMetricsSnapshot {
            count_queries: self.count_queries.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            records_fetched: self.records_fetched.load(Ordering::Relaxed),
            page_sizes: self
                .page_sizes
                .lock()
                .map(|sizes| sizes.clone())
                .unwrap_or_default(),
        }
    }

    /// Clear all counters
    pub fn reset(&self) {
        self.count_queries.store(0, Ordering::Relaxed);
        self.pages_fetched.store(0, Ordering::Relaxed);
        self.records_fetched.store(0, Ordering::Relaxed);
        if let Ok(mut sizes) = self.page_sizes.lock() {
            sizes.clear();
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMetricsSnapshot {
    /// Count queries executed
    pub count_queries: u64,

    /// Page fetches executed
    pub pages_fetched: u64,

    /// Records returned across all pages
    pub records_fetched: u64,

    /// Size of every page returned, in fetch order
    pub page_sizes: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let metrics = SourceMetrics::new();
        metrics.record_count();
        metrics.record_page(3);
        metrics.record_page(1);

        let snap = metrics.snapshot();
        assert_eq!(snap.count_queries, 1);
        assert_eq!(snap.pages_fetched, 2);
        assert_eq!(snap.records_fetched, 4);
        assert_eq!(snap.page_sizes, vec![3, 1]);

        metrics.reset();
        assert_eq!(metrics.snapshot(), SourceMetricsSnapshot::default());
    }
}
