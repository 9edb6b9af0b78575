//! Pipeline statistics and metrics.

use std::time::Duration;

use scheduler::MetricsSnapshot;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total descriptors emitted by the monitor
    pub descriptors: u64,

    /// Total descriptors handed to the scheduler
    pub dispatched: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Number of registered processors
    pub active_processors: usize,

    /// Descriptor outcome summary
    pub summary: observability::DescriptorSummary,

    /// Per-processor invocation counters
    pub processor_metrics: Vec<(String, MetricsSnapshot)>,
}

impl PipelineStats {
    /// Calculate descriptors per second throughput
    pub fn descriptors_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.descriptors as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Pipeline Statistics                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Descriptors emitted: {}", self.descriptors);
        println!("   ├─ Descriptors dispatched: {}", self.dispatched);
        println!("   ├─ Throughput: {:.2}/s", self.descriptors_per_sec());
        println!("   └─ Active processors: {}", self.active_processors);

        println!("\n📈 Fetch Outcomes");
        println!("   ├─ Valid: {}", self.summary.valid);
        println!(
            "   ├─ Invalid: {} ({:.2}%)",
            self.summary.invalid, self.summary.invalid_rate
        );
        println!("   └─ Latency (ms): {}", self.summary.latency_ms);

        if !self.processor_metrics.is_empty() {
            println!("\n⚙️  Processors");
            for (i, (name, snapshot)) in self.processor_metrics.iter().enumerate() {
                let is_last = i == self.processor_metrics.len() - 1;
                let prefix = if is_last { "└─" } else { "├─" };
                println!(
                    "   {} {}: {} invocations, {} failures",
                    prefix, name, snapshot.invocations, snapshot.failures
                );
            }
        }

        println!();
    }
}
