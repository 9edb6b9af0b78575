//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref currency) = args.currency {
        info!(currency = %currency, "Overriding currency from CLI");
        blueprint.request.currency = currency.clone();
    }
    if let Some(history) = args.history {
        info!(history = history, "Overriding history window from CLI");
        blueprint.request.history_days = history;
    }
    if let Some(attempts) = args.attempts_per_tick {
        info!(attempts = attempts, "Overriding attempts per tick from CLI");
        blueprint.monitor.attempts_per_tick = attempts;
    }
    if let Some(interval) = args.tick_interval_ms {
        info!(interval_ms = interval, "Overriding tick interval from CLI");
        blueprint.monitor.tick_interval_ms = interval;
    }
    if let Some(capacity) = args.channel_capacity {
        info!(capacity = capacity, "Overriding channel capacity from CLI");
        blueprint.monitor.channel_capacity = capacity;
    }

    info!(
        domain = %blueprint.request.domain,
        currency = %blueprint.request.currency,
        history_days = blueprint.request.history_days,
        attempts_per_tick = blueprint.monitor.attempts_per_tick,
        tick_interval_ms = blueprint.monitor.tick_interval_ms,
        processors = blueprint.processors.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        blueprint,
        max_descriptors: if args.max_descriptors == 0 {
            None
        } else {
            Some(args.max_descriptors)
        },
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create pipeline and wire graceful shutdown to a cancellation token
    let pipeline = Pipeline::new(pipeline_config);
    let cancel = CancellationToken::new();

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        warn!("Received shutdown signal, stopping pipeline...");
        shutdown.cancel();
    });

    info!("Starting pipeline...");

    let stats = pipeline
        .run(cancel)
        .await
        .context("Pipeline execution failed")?;

    info!(
        descriptors = stats.descriptors,
        dispatched = stats.dispatched,
        duration_secs = stats.duration.as_secs_f64(),
        rate = format!("{:.2}", stats.descriptors_per_sec()),
        "Pipeline completed successfully"
    );

    // Print detailed statistics
    stats.print_summary();

    info!("Ratewatch finished");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::PipelineBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Request:");
    println!("  Domain: {}", blueprint.request.domain);
    println!("  Currency: {}", blueprint.request.currency);
    println!("  History: {} rates", blueprint.request.history_days);

    println!("\nMonitor:");
    println!("  Attempts per tick: {}", blueprint.monitor.attempts_per_tick);
    println!("  Tick interval: {}ms", blueprint.monitor.tick_interval_ms);
    println!("  Channel capacity: {}", blueprint.monitor.channel_capacity);

    if !blueprint.processors.is_empty() {
        println!("\nProcessors ({}):", blueprint.processors.len());
        for processor in &blueprint.processors {
            println!("  - {} ({:?})", processor.name, processor.kind);
        }
    }

    println!();
}
