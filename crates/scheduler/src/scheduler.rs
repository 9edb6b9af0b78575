//! Scheduler - main loop fanning descriptors out to processors

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use contracts::{ContractError, Descriptor, Processor};

use crate::error::{DispatchError, ProcessorFailure};
use crate::metrics::{MetricsSnapshot, ProcessorMetrics};

struct Registration<T> {
    processor: Arc<dyn Processor<T>>,
    metrics: Arc<ProcessorMetrics>,
}

/// Fan-out dispatcher with an insertion-ordered processor registry
///
/// Registration is a setup-time operation; during dispatch the registry is
/// read-only. One fan-out runs at a time: the next descriptor is not read
/// until every processor has returned for the current one, so a full input
/// channel back-pressures the monitor.
pub struct Scheduler<T> {
    registry: Vec<Registration<T>>,
}

impl<T> Default for Scheduler<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a scheduler with an empty registry
    pub fn new() -> Self {
        Self {
            registry: Vec::new(),
        }
    }

    /// Append a processor to the registry
    ///
    /// No deduplication, no removal. Order affects log ordering only.
    pub fn register(&mut self, processor: Arc<dyn Processor<T>>) {
        debug!(processor = processor.name(), "registered processor");
        self.registry.push(Registration {
            processor,
            metrics: Arc::new(ProcessorMetrics::new()),
        });
    }

    /// Number of registered processors
    pub fn processor_count(&self) -> usize {
        self.registry.len()
    }

    /// Get metrics for all processors
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.registry
            .iter()
            .map(|r| (r.processor.name().to_string(), r.metrics.snapshot()))
            .collect()
    }

    /// Run the dispatch loop
    ///
    /// Consumes descriptors until the input channel closes; descriptors
    /// already queued at cancellation are still dispatched, since the
    /// producer stops on the same token and the channel closes promptly.
    /// The token itself only unblocks in-flight processors. Aggregated
    /// processor failures are logged and discarded; they never stop the
    /// loop. Returns the number of descriptors dispatched.
    pub async fn dispatch(
        &self,
        cancel: CancellationToken,
        mut input: mpsc::Receiver<Descriptor<T>>,
    ) -> u64 {
        info!(processors = self.registry.len(), "scheduler started");

        let mut dispatched: u64 = 0;

        while let Some(descriptor) = input.recv().await {
            dispatched += 1;
            if let Err(err) = self.fan_out(&cancel, descriptor).await {
                error!(error = %err, "failure while processing descriptor");
            }
        }

        info!(descriptors = dispatched, "scheduler input closed, shutting down");
        dispatched
    }

    /// Fan one descriptor out to every registered processor
    ///
    /// One task per processor, each racing the processor call against the
    /// cancellation token so a stuck processor cannot wedge the loop. Each
    /// task owns its own result slot; results are merged after the join.
    async fn fan_out(
        &self,
        cancel: &CancellationToken,
        descriptor: Descriptor<T>,
    ) -> Result<(), DispatchError> {
        if self.registry.is_empty() {
            return Ok(());
        }

        let handles: Vec<JoinHandle<Result<(), ContractError>>> = self
            .registry
            .iter()
            .map(|registration| {
                let processor = Arc::clone(&registration.processor);
                let metrics = Arc::clone(&registration.metrics);
                let descriptor = descriptor.clone();
                let cancel = cancel.clone();

                tokio::spawn(async move {
                    metrics.inc_invocations();
                    // Biased so a processor that is already done beats an
                    // already-cancelled token during the shutdown drain.
                    let result = tokio::select! {
                        biased;
                        result = processor.process(&descriptor) => result,
                        _ = cancel.cancelled() => Err(ContractError::processor(
                            processor.name(),
                            "cancelled before completion",
                        )),
                    };
                    if result.is_err() {
                        metrics.inc_failures();
                    }
                    result
                })
            })
            .collect();

        let mut failures = Vec::new();
        for (registration, handle) in self.registry.iter().zip(handles) {
            let name = registration.processor.name();
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => failures.push(ProcessorFailure {
                    processor: name.to_string(),
                    error,
                }),
                Err(join_error) => failures.push(ProcessorFailure {
                    processor: name.to_string(),
                    error: ContractError::processor(
                        name,
                        format!("task panicked: {join_error}"),
                    ),
                }),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError {
                descriptor_id: descriptor.id,
                failures,
            })
        }
    }
}
