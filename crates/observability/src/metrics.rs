//! Pipeline metric collection
//!
//! Records descriptor and fan-out metrics and aggregates in-memory
//! statistics for the end-of-run summary.

use std::time::Duration;

use contracts::Descriptor;
use metrics::{counter, histogram};

/// Record one descriptor leaving the monitor
///
/// Called for every descriptor, including partial ones from failed
/// attempts.
pub fn record_descriptor<T>(descriptor: &Descriptor<T>) {
    counter!("ratewatch_descriptors_total").increment(1);

    if descriptor.is_valid() {
        counter!("ratewatch_descriptors_valid_total").increment(1);
    } else {
        counter!("ratewatch_descriptors_invalid_total").increment(1);
    }

    histogram!("ratewatch_fetch_duration_ms").record(descriptor.duration.as_secs_f64() * 1000.0);
}

/// Record a fetch attempt that did not produce a fully valid descriptor
pub fn record_fetch_failure(url: &str) {
    counter!(
        "ratewatch_fetch_failures_total",
        "url" => url.to_string()
    )
    .increment(1);
}

/// Descriptor metrics aggregator
///
/// Aggregates metrics in memory for the end-of-run summary.
#[derive(Debug, Clone, Default)]
pub struct DescriptorAggregator {
    /// Total descriptors observed
    pub total: u64,

    /// Descriptors with all three flags set
    pub valid: u64,

    /// Descriptors from failed or partial attempts
    pub invalid: u64,

    /// Fetch latency statistics (milliseconds)
    pub latency_ms: RunningStats,
}

impl DescriptorAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Update aggregated statistics with one descriptor
    pub fn update<T>(&mut self, descriptor: &Descriptor<T>) {
        self.total += 1;
        if descriptor.is_valid() {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
        if descriptor.duration > Duration::ZERO {
            self.latency_ms
                .push(descriptor.duration.as_secs_f64() * 1000.0);
        }
    }

    /// Generate summary report
    pub fn summary(&self) -> DescriptorSummary {
        DescriptorSummary {
            total: self.total,
            valid: self.valid,
            invalid: self.invalid,
            invalid_rate: if self.total > 0 {
                self.invalid as f64 / self.total as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_ms),
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct DescriptorSummary {
    pub total: u64,
    pub valid: u64,
    pub invalid: u64,
    pub invalid_rate: f64,
    pub latency_ms: StatsSummary,
}

impl std::fmt::Display for DescriptorSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Descriptor Summary ===")?;
        writeln!(f, "Total descriptors: {}", self.total)?;
        writeln!(f, "Valid: {}", self.valid)?;
        writeln!(
            f,
            "Invalid: {} ({:.2}%)",
            self.invalid, self.invalid_rate
        )?;
        writeln!(f, "Fetch latency (ms): {}", self.latency_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean value
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum value
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum value
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};

    use metrics::atomics::AtomicU64;
    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};

    /// Recorder capturing counter increments by metric name
    #[derive(Default)]
    struct CountingRecorder {
        counters: Mutex<HashMap<String, Arc<AtomicU64>>>,
    }

    impl CountingRecorder {
        fn counter(&self, name: &str) -> u64 {
            self.counters
                .lock()
                .unwrap()
                .get(name)
                .map(|cell| cell.load(Ordering::Relaxed))
                .unwrap_or(0)
        }
    }

    impl Recorder for CountingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            let cell = self
                .counters
                .lock()
                .unwrap()
                .entry(key.name().to_string())
                .or_insert_with(|| Arc::new(AtomicU64::new(0)))
                .clone();
            Counter::from_arc(cell)
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_descriptor_counters_emitted() {
        let recorder = CountingRecorder::default();

        metrics::with_local_recorder(&recorder, || {
            let mut valid: Descriptor<u64> = Descriptor::new("1", "http://host");
            valid.valid_status_code = true;
            valid.json_content_type = true;
            valid.well_formed_payload = true;

            let partial: Descriptor<u64> = Descriptor::new("2", "http://host");

            record_descriptor(&valid);
            record_descriptor(&partial);
            record_fetch_failure(&partial.url);
        });

        assert_eq!(recorder.counter("ratewatch_descriptors_total"), 2);
        assert_eq!(recorder.counter("ratewatch_descriptors_valid_total"), 1);
        assert_eq!(recorder.counter("ratewatch_descriptors_invalid_total"), 1);
        assert_eq!(recorder.counter("ratewatch_fetch_failures_total"), 1);
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = DescriptorAggregator::new();

        let mut valid: Descriptor<u64> = Descriptor::new("1", "http://host");
        valid.valid_status_code = true;
        valid.json_content_type = true;
        valid.well_formed_payload = true;
        valid.duration = Duration::from_millis(20);

        let partial: Descriptor<u64> = Descriptor::new("2", "http://host");

        aggregator.update(&valid);
        aggregator.update(&partial);

        assert_eq!(aggregator.total, 2);
        assert_eq!(aggregator.valid, 1);
        assert_eq!(aggregator.invalid, 1);
        // Zero-duration attempts are excluded from latency stats.
        assert_eq!(aggregator.latency_ms.count(), 1);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = DescriptorAggregator::new();
        let partial: Descriptor<u64> = Descriptor::new("1", "http://host");
        aggregator.update(&partial);

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Total descriptors: 1"));
        assert!(output.contains("100.00%"));
        assert!(output.contains("N/A"));
    }
}
