//! Pipeline orchestrator - coordinates all components.
//!
//! Wires the monitor's descriptor channel into the scheduler, builds
//! processors from the blueprint, and collects run statistics.

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{Currency, PipelineBlueprint, Processor, ProcessorConfig, ProcessorKind};
use fetch_client::{Converter, CurrencyFetcher, RateRequest};
use monitor::Monitor;
use observability::DescriptorAggregator;
use scheduler::{ClosedInterval, LogProcessor, RateAlertProcessor, Scheduler, WriterProcessor};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The pipeline blueprint configuration
    pub blueprint: PipelineBlueprint,

    /// Maximum number of descriptors to dispatch (None = unlimited)
    pub max_descriptors: Option<u64>,

    /// Pipeline deadline (None = run until cancelled)
    pub timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline until the token fires, the deadline passes, or
    /// the descriptor limit is reached
    pub async fn run(self, cancel: CancellationToken) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Resolve the request target
        let template = RateRequest::new(&blueprint.request.domain)
            .currency(&blueprint.request.currency)
            .history(blueprint.request.history_days)
            .build()
            .context("Failed to build request template")?;

        info!(url = %template.url(), "Request target resolved");

        // Setup Monitor
        let fetcher =
            CurrencyFetcher::new(Converter::new()).context("Failed to build HTTP fetcher")?;
        let monitor = Monitor::new(fetcher);
        let settings = blueprint.monitor_settings();
        let channel_capacity = settings.channel_capacity;

        let mut monitor_rx = monitor
            .start(cancel.clone(), settings, template)
            .context("Failed to start monitor")?;

        info!("Monitor started");

        // Setup Scheduler
        if blueprint.processors.is_empty() {
            warn!("No processors configured - descriptors will be dropped");
        }

        let mut sched = Scheduler::new();
        for processor_config in &blueprint.processors {
            sched.register(build_processor(processor_config)?);
        }
        let active_processors = sched.processor_count();

        info!(active_processors, "Scheduler configured");

        let (sched_tx, sched_rx) = mpsc::channel(channel_capacity);

        // The deadline fires the shared token, so both loops drain and
        // the run still produces real statistics.
        if let Some(timeout) = self.config.timeout {
            let deadline_cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                warn!(timeout_secs = timeout.as_secs(), "Pipeline deadline reached");
                deadline_cancel.cancel();
            });
        }

        let max_descriptors = self.config.max_descriptors;

        info!(max_descriptors = ?max_descriptors, "Pipeline running");

        // Forward descriptors from the monitor into the scheduler,
        // aggregating outcome statistics on the way through.
        let forward_cancel = cancel.clone();
        let forward_task = async move {
            let mut aggregator = DescriptorAggregator::new();
            let mut descriptors: u64 = 0;

            while let Some(descriptor) = monitor_rx.recv().await {
                descriptors += 1;
                aggregator.update(&descriptor);
                observability::record_descriptor(&descriptor);
                if !descriptor.is_valid() {
                    observability::record_fetch_failure(&descriptor.url);
                }

                if sched_tx.send(descriptor).await.is_err() {
                    warn!("Scheduler channel closed");
                    break;
                }

                if let Some(max) = max_descriptors {
                    if descriptors >= max {
                        info!(descriptors, "Reached max descriptors limit");
                        forward_cancel.cancel();
                        break;
                    }
                }
            }

            (descriptors, aggregator)
        };

        let ((descriptors, aggregator), dispatched) =
            tokio::join!(forward_task, sched.dispatch(cancel.clone(), sched_rx));

        let stats = PipelineStats {
            descriptors,
            dispatched,
            duration: start_time.elapsed(),
            active_processors,
            summary: aggregator.summary(),
            processor_metrics: sched.metrics(),
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            rate = format!("{:.2}", stats.descriptors_per_sec()),
            "Pipeline shutdown complete"
        );

        Ok(stats)
    }
}

/// Build a processor from its blueprint entry
fn build_processor(config: &ProcessorConfig) -> Result<Arc<dyn Processor<Currency>>> {
    match config.kind {
        ProcessorKind::Writer => {
            let out = open_output(config)?;
            Ok(Arc::new(WriterProcessor::new(&config.name, out)))
        }
        ProcessorKind::Log => Ok(Arc::new(LogProcessor::new(&config.name))),
        ProcessorKind::RateAlert => {
            let low = required_f64(config, "low")?;
            let high = required_f64(config, "high")?;
            let out = open_output(config)?;
            Ok(Arc::new(RateAlertProcessor::new(
                &config.name,
                ClosedInterval { low, high },
                out,
            )))
        }
    }
}

/// Open the processor's output: the `path` param, or stdout without one
fn open_output(config: &ProcessorConfig) -> Result<Box<dyn Write + Send>> {
    match config.params.get("path") {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| {
                    format!("Failed to open output '{}' for processor '{}'", path, config.name)
                })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

/// Read a required numeric parameter
fn required_f64(config: &ProcessorConfig, key: &str) -> Result<f64> {
    let raw = config.params.get(key).with_context(|| {
        format!("Processor '{}' is missing the '{}' parameter", config.name, key)
    })?;
    raw.parse().with_context(|| {
        format!(
            "Processor '{}' parameter '{}' is not a number: '{}'",
            config.name, key, raw
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn processor_config(kind: ProcessorKind, params: &[(&str, &str)]) -> ProcessorConfig {
        ProcessorConfig {
            name: "test".to_string(),
            kind,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_build_log_processor() {
        let processor = build_processor(&processor_config(ProcessorKind::Log, &[])).unwrap();
        assert_eq!(processor.name(), "test");
    }

    #[test]
    fn test_rate_alert_requires_bounds() {
        let err =
            build_processor(&processor_config(ProcessorKind::RateAlert, &[("low", "4.0")]))
                .unwrap_err();
        assert!(err.to_string().contains("high"));
    }

    #[test]
    fn test_rate_alert_rejects_non_numeric_bound() {
        let config =
            processor_config(ProcessorKind::RateAlert, &[("low", "4.0"), ("high", "much")]);
        let err = build_processor(&config).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn test_writer_writes_to_file_param() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let config = processor_config(
            ProcessorKind::Writer,
            &[("path", path.to_str().unwrap())],
        );

        build_processor(&config).unwrap();
        assert!(path.exists());
    }
}
