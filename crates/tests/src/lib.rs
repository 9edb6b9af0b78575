//! # Integration Tests
//!
//! End-to-end tests over the whole pipeline.
//!
//! Responsibilities:
//! - Contract snapshot tests
//! - Mock e2e tests (no network required)
//! - Configuration-to-pipeline wiring tests

#[cfg(test)]
mod contract_tests {
    use contracts::Descriptor;

    #[test]
    fn test_descriptor_line_format_is_frozen() {
        let descriptor: Descriptor<u64> = Descriptor::new("a1", "http://api.example.com/rates");
        let line = descriptor.render_line();
        assert!(line.starts_with("request id=a1 url=http://api.example.com/rates time="));
        assert!(line.contains("validStatusCode=false json=false validJson=false"));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use contracts::{
        ContractError, Descriptor, FetchFailure, Fetcher, MonitorSettings, Processor,
        RequestTemplate,
    };
    use monitor::Monitor;
    use observability::DescriptorAggregator;
    use scheduler::{Scheduler, WriterProcessor};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    /// Fetcher producing fully valid descriptors with sequential ids
    struct SequentialFetcher {
        attempts: AtomicU64,
    }

    impl SequentialFetcher {
        fn new() -> Self {
            Self {
                attempts: AtomicU64::new(0),
            }
        }
    }

    impl Fetcher for SequentialFetcher {
        type Payload = u64;

        async fn perform(
            &self,
            template: &RequestTemplate,
        ) -> Result<Descriptor<u64>, FetchFailure<u64>> {
            let id = self.attempts.fetch_add(1, Ordering::SeqCst);
            let mut descriptor: Descriptor<u64> =
                Descriptor::new(id.to_string(), template.url());
            descriptor.valid_status_code = true;
            descriptor.json_content_type = true;
            descriptor.well_formed_payload = true;
            descriptor.payload = id;
            Ok(descriptor)
        }
    }

    /// Processor recording every descriptor id, optionally failing
    struct RecordingProcessor {
        name: String,
        seen: Mutex<Vec<String>>,
        fail_with: Option<String>,
    }

    impl RecordingProcessor {
        fn ok(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                seen: Mutex::new(Vec::new()),
                fail_with: None,
            })
        }

        fn failing(name: &str, message: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                seen: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Processor<u64> for RecordingProcessor {
        fn name(&self) -> &str {
            &self.name
        }

        async fn process(&self, descriptor: &Descriptor<u64>) -> Result<(), ContractError> {
            self.seen.lock().unwrap().push(descriptor.id.clone());
            match &self.fail_with {
                Some(message) => Err(ContractError::processor(&self.name, message)),
                None => Ok(()),
            }
        }
    }

    /// Shared in-memory writer for assertions
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn settings(attempts: u32, interval: Duration) -> MonitorSettings {
        MonitorSettings {
            attempts_per_tick: attempts,
            tick_interval: interval,
            channel_capacity: 16,
        }
    }

    /// Forward every monitor descriptor into the scheduler's channel,
    /// aggregating outcome statistics on the way through
    async fn forward(
        mut rx: mpsc::Receiver<Descriptor<u64>>,
        tx: mpsc::Sender<Descriptor<u64>>,
    ) -> DescriptorAggregator {
        let mut aggregator = DescriptorAggregator::new();
        while let Some(descriptor) = rx.recv().await {
            aggregator.update(&descriptor);
            if tx.send(descriptor).await.is_err() {
                break;
            }
        }
        aggregator
    }

    /// End-to-end: Monitor -> channel -> Scheduler fan-out
    ///
    /// One succeeding and one failing processor both see every burst; the
    /// failure never suppresses the other processor or stops the stream.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_monitor_to_scheduler() {
        let succeeding = RecordingProcessor::ok("succeeding");
        let failing = RecordingProcessor::failing("failing", "boom");

        let mut sched = Scheduler::new();
        sched.register(succeeding.clone());
        sched.register(failing.clone());

        let cancel = CancellationToken::new();
        let monitor = Monitor::new(SequentialFetcher::new());
        let monitor_rx = monitor
            .start(
                cancel.clone(),
                settings(2, Duration::from_millis(100)),
                RequestTemplate::new("http://some/domain"),
            )
            .unwrap();

        let (sched_tx, sched_rx) = mpsc::channel(16);
        let forwarder = tokio::spawn(forward(monitor_rx, sched_tx));

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            canceller.cancel();
        });

        let dispatched = sched.dispatch(cancel, sched_rx).await;
        let summary = forwarder.await.unwrap().summary();

        // burst at t=0 plus ticks at 100ms and 200ms, two attempts each
        assert!(summary.total >= 4, "forwarded only {} descriptors", summary.total);
        assert!(dispatched >= 4, "dispatched only {dispatched} descriptors");
        assert_eq!(summary.invalid, 0);

        // Failure isolation: both processors saw the same stream.
        assert_eq!(succeeding.seen(), failing.seen());

        let metrics = sched.metrics();
        let failing_metrics = &metrics[1].1;
        assert_eq!(failing_metrics.failures, failing_metrics.invocations);
    }

    /// Descriptors reach processors in the order the monitor issued them
    #[tokio::test]
    async fn test_e2e_preserves_issuance_order() {
        let recorder = RecordingProcessor::ok("recorder");

        let mut sched = Scheduler::new();
        sched.register(recorder.clone());

        // A pre-cancelled token still yields the complete first burst.
        let cancel = CancellationToken::new();
        cancel.cancel();

        let monitor = Monitor::new(SequentialFetcher::new());
        let monitor_rx = monitor
            .start(
                cancel.clone(),
                settings(5, Duration::from_secs(60)),
                RequestTemplate::new("http://some/domain"),
            )
            .unwrap();

        let (sched_tx, sched_rx) = mpsc::channel(16);
        let forwarder = tokio::spawn(forward(monitor_rx, sched_tx));

        // The shared cancelled token must not cost queued descriptors: the
        // scheduler drains until the channel closes behind the monitor.
        let dispatched = sched.dispatch(cancel, sched_rx).await;
        forwarder.await.unwrap();

        assert_eq!(dispatched, 5);
        assert_eq!(recorder.seen(), vec!["0", "1", "2", "3", "4"]);
    }

    /// Blueprint settings drive the monitor and a writer processor
    #[tokio::test]
    async fn test_e2e_config_to_writer_output() {
        let blueprint = config_loader::ConfigLoader::load_from_str(
            r#"
            [monitor]
            attempts_per_tick = 3
            tick_interval_ms = 60000
            channel_capacity = 8

            [request]
            currency = "EUR"
            "#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        let buf = SharedBuf::default();
        let mut sched = Scheduler::new();
        sched.register(Arc::new(WriterProcessor::new("stdout", buf.clone())));

        let cancel = CancellationToken::new();
        cancel.cancel();

        // Resolve the template exactly as the orchestrator would; the mock
        // fetcher never actually touches the network.
        let template = fetch_client::RateRequest::new(&blueprint.request.domain)
            .currency(&blueprint.request.currency)
            .history(blueprint.request.history_days)
            .build()
            .unwrap();
        assert!(template.url().contains("/eur/last/1"));

        let monitor = Monitor::new(SequentialFetcher::new());
        let monitor_rx = monitor
            .start(cancel.clone(), blueprint.monitor_settings(), template)
            .unwrap();

        let (sched_tx, sched_rx) = mpsc::channel(8);
        let forwarder = tokio::spawn(forward(monitor_rx, sched_tx));

        sched.dispatch(cancel, sched_rx).await;
        forwarder.await.unwrap();

        let contents = buf.contents();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents
            .lines()
            .all(|line| line.starts_with("request id=")));
    }
}
