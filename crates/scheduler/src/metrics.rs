//! Per-processor metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single registered processor
#[derive(Debug, Default)]
pub struct ProcessorMetrics {
    /// Total invocations
    invocations: AtomicU64,
    /// Total failed invocations
    failures: AtomicU64,
}

impl ProcessorMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total invocation count
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Increment invocation count
    pub fn inc_invocations(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            invocations: self.invocations(),
            failures: self.failures(),
        }
    }
}

/// Snapshot of processor metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub invocations: u64,
    pub failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let metrics = ProcessorMetrics::new();
        metrics.inc_invocations();
        metrics.inc_invocations();
        metrics.inc_failures();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.invocations, 2);
        assert_eq!(snapshot.failures, 1);
    }
}
