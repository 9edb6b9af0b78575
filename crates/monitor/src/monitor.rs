//! Monitor - tick loop producing bursts of fetch attempts

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use contracts::{ContractError, Descriptor, Fetcher, MonitorSettings, RequestTemplate};

/// Timer-driven producer of fetch descriptors
///
/// Owns an injected fetcher and, once started, a request template. One
/// background task per `start` call drives the loop; attempts within a
/// burst run sequentially so the emit order equals the issuance order.
pub struct Monitor<F> {
    fetcher: Arc<F>,
}

impl<F> Monitor<F>
where
    F: Fetcher + Send + Sync + 'static,
    F::Payload: Send + 'static,
{
    /// Create a monitor around the given fetcher
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }

    /// Start the tick loop
    ///
    /// Performs one burst immediately, then one per tick interval until
    /// the token is cancelled. A burst already started completes before
    /// the next cancellation check. The returned channel closes when the
    /// loop exits.
    ///
    /// # Errors
    /// Rejects invalid settings before spawning anything.
    pub fn start(
        &self,
        cancel: CancellationToken,
        settings: MonitorSettings,
        template: RequestTemplate,
    ) -> Result<mpsc::Receiver<Descriptor<F::Payload>>, ContractError> {
        settings.validate()?;

        let (tx, rx) = mpsc::channel(settings.channel_capacity);
        let fetcher = Arc::clone(&self.fetcher);

        tokio::spawn(async move {
            info!(
                attempts_per_tick = settings.attempts_per_tick,
                tick_interval = ?settings.tick_interval,
                url = %template.url(),
                "monitor started"
            );

            // The first burst runs before any cancellation check, so a
            // token cancelled up front still yields one complete burst.
            if !burst(fetcher.as_ref(), &template, settings.attempts_per_tick, &tx).await {
                return;
            }

            let mut ticker = interval_at(
                Instant::now() + settings.tick_interval,
                settings.tick_interval,
            );
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("monitor cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !burst(fetcher.as_ref(), &template, settings.attempts_per_tick, &tx).await {
                            break;
                        }
                    }
                }
            }

            debug!("monitor loop stopped");
        });

        Ok(rx)
    }
}

/// Issue one burst of sequential fetch attempts
///
/// A failed attempt is logged and its partial descriptor still emitted;
/// the failure never aborts the burst. Returns false once the receiver is
/// gone.
async fn burst<F>(
    fetcher: &F,
    template: &RequestTemplate,
    attempts: u32,
    tx: &mpsc::Sender<Descriptor<F::Payload>>,
) -> bool
where
    F: Fetcher,
{
    for _ in 0..attempts {
        let descriptor = match fetcher.perform(template).await {
            Ok(descriptor) => descriptor,
            Err(failure) => {
                error!(
                    id = %failure.descriptor.id,
                    error = %failure.error,
                    "monitor failed to process a request"
                );
                failure.descriptor
            }
        };
        if tx.send(descriptor).await.is_err() {
            debug!("descriptor channel closed, stopping monitor");
            return false;
        }
    }
    true
}
