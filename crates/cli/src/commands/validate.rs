//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    domain: String,
    currency: String,
    history_days: u32,
    attempts_per_tick: u32,
    tick_interval_ms: u64,
    processor_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    domain: blueprint.request.domain.clone(),
                    currency: blueprint.request.currency.clone(),
                    history_days: blueprint.request.history_days,
                    attempts_per_tick: blueprint.monitor.attempts_per_tick,
                    tick_interval_ms: blueprint.monitor.tick_interval_ms,
                    processor_count: blueprint.processors.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &contracts::PipelineBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    // Check for empty processors
    if blueprint.processors.is_empty() {
        warnings.push("No processors configured - descriptors will be dropped".to_string());
    }

    // A very short tick with many attempts can outrun the API
    if blueprint.monitor.tick_interval_ms < 1000 && blueprint.monitor.attempts_per_tick > 10 {
        warnings.push(format!(
            "{} attempts every {}ms may exceed the rate API's limits",
            blueprint.monitor.attempts_per_tick, blueprint.monitor.tick_interval_ms
        ));
    }

    // Long history windows inflate every response payload
    if blueprint.request.history_days > 255 {
        warnings.push(format!(
            "history_days = {} exceeds the API maximum of 255 and will be rejected upstream",
            blueprint.request.history_days
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Domain: {}", summary.domain);
            println!("  Currency: {}", summary.currency);
            println!("  History: {} rates", summary.history_days);
            println!(
                "  Cadence: {} attempts every {}ms",
                summary.attempts_per_tick, summary.tick_interval_ms
            );
            println!("  Processors: {}", summary.processor_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
