//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    request: RequestInfo,
    monitor: MonitorInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    processors: Vec<ProcessorInfo>,
}

#[derive(Serialize)]
struct RequestInfo {
    domain: String,
    currency: String,
    history_days: u32,
    url: String,
}

#[derive(Serialize)]
struct MonitorInfo {
    attempts_per_tick: u32,
    tick_interval_ms: u64,
    channel_capacity: usize,
}

#[derive(Serialize)]
struct ProcessorInfo {
    name: String,
    kind: String,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    params: std::collections::HashMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

/// Resolved request URL, or the builder error as text
fn resolved_url(blueprint: &contracts::PipelineBlueprint) -> String {
    let request = fetch_client::RateRequest::new(&blueprint.request.domain)
        .currency(&blueprint.request.currency)
        .history(blueprint.request.history_days);
    match request.build() {
        Ok(template) => template.url().to_string(),
        Err(e) => format!("(invalid: {e})"),
    }
}

fn build_config_info(blueprint: &contracts::PipelineBlueprint, args: &InfoArgs) -> ConfigInfo {
    let processors = blueprint
        .processors
        .iter()
        .map(|p| ProcessorInfo {
            name: p.name.clone(),
            kind: format!("{:?}", p.kind),
            params: if args.processors {
                p.params.clone()
            } else {
                std::collections::HashMap::new()
            },
        })
        .collect();

    ConfigInfo {
        request: RequestInfo {
            domain: blueprint.request.domain.clone(),
            currency: blueprint.request.currency.clone(),
            history_days: blueprint.request.history_days,
            url: resolved_url(blueprint),
        },
        monitor: MonitorInfo {
            attempts_per_tick: blueprint.monitor.attempts_per_tick,
            tick_interval_ms: blueprint.monitor.tick_interval_ms,
            channel_capacity: blueprint.monitor.channel_capacity,
        },
        processors,
    }
}

fn print_config_info(blueprint: &contracts::PipelineBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Ratewatch Configuration                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Request target
    println!("🌐 Request");
    println!("   ├─ Domain: {}", blueprint.request.domain);
    println!("   ├─ Currency: {}", blueprint.request.currency);
    println!("   ├─ History: {} rates", blueprint.request.history_days);
    println!("   └─ URL: {}", resolved_url(blueprint));

    // Monitor cadence
    println!("\n⏱  Monitor");
    println!(
        "   ├─ Attempts per tick: {}",
        blueprint.monitor.attempts_per_tick
    );
    println!(
        "   ├─ Tick interval: {}ms",
        blueprint.monitor.tick_interval_ms
    );
    println!(
        "   └─ Channel capacity: {}",
        blueprint.monitor.channel_capacity
    );

    // Processors
    if !blueprint.processors.is_empty() {
        println!("\n📤 Processors ({})", blueprint.processors.len());
        for (i, processor) in blueprint.processors.iter().enumerate() {
            let is_last = i == blueprint.processors.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            let child_prefix = if is_last { "   " } else { "│  " };

            println!("   {} {} ({:?})", prefix, processor.name, processor.kind);

            if args.processors && !processor.params.is_empty() {
                let mut params: Vec<_> = processor.params.iter().collect();
                params.sort();
                for (j, (key, value)) in params.iter().enumerate() {
                    let param_is_last = j == params.len() - 1;
                    let param_prefix = if param_is_last { "└─" } else { "├─" };
                    println!("   {}  {} {} = {}", child_prefix, param_prefix, key, value);
                }
            }
        }
    } else {
        println!("\n📤 Processors: (none)");
    }

    println!();
}
