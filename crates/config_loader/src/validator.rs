//! Configuration validation
//!
//! Rules:
//! - attempts_per_tick >= 1, tick_interval_ms > 0, channel_capacity >= 1
//! - currency is a three-letter alphabetic code
//! - history_days >= 1
//! - processor names unique
//! - rate_alert params parse as numbers with low <= high

use std::collections::HashSet;

use contracts::{ContractError, PipelineBlueprint, ProcessorConfig, ProcessorKind};

/// Validate a PipelineBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    blueprint.monitor_settings().validate()?;
    validate_request(blueprint)?;
    validate_processor_names(blueprint)?;
    validate_processor_params(blueprint)?;
    Ok(())
}

fn validate_request(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let request = &blueprint.request;

    if request.domain.is_empty() {
        return Err(ContractError::config_validation(
            "request.domain",
            "must not be empty",
        ));
    }
    if request.currency.len() != 3 || !request.currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ContractError::config_validation(
            "request.currency",
            format!(
                "must be a three-letter currency code, got '{}'",
                request.currency
            ),
        ));
    }
    if request.history_days == 0 {
        return Err(ContractError::config_validation(
            "request.history_days",
            "must be >= 1",
        ));
    }
    Ok(())
}

fn validate_processor_names(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for processor in &blueprint.processors {
        if processor.name.is_empty() {
            return Err(ContractError::config_validation(
                "processors[].name",
                "must not be empty",
            ));
        }
        if !seen.insert(&processor.name) {
            return Err(ContractError::config_validation(
                format!("processors[name={}]", processor.name),
                "duplicate processor name",
            ));
        }
    }
    Ok(())
}

fn validate_processor_params(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    for processor in &blueprint.processors {
        if processor.kind == ProcessorKind::RateAlert {
            validate_rate_alert_params(processor)?;
        }
    }
    Ok(())
}

fn validate_rate_alert_params(processor: &ProcessorConfig) -> Result<(), ContractError> {
    let low = required_number(processor, "low")?;
    let high = required_number(processor, "high")?;
    if low > high {
        return Err(ContractError::config_validation(
            format!("processors[name={}].params", processor.name),
            format!("low ({low}) must be <= high ({high})"),
        ));
    }
    Ok(())
}

fn required_number(processor: &ProcessorConfig, key: &str) -> Result<f64, ContractError> {
    let field = format!("processors[name={}].params.{key}", processor.name);
    let raw = processor
        .params
        .get(key)
        .ok_or_else(|| ContractError::config_validation(&field, "missing required parameter"))?;
    raw.parse::<f64>()
        .map_err(|_| ContractError::config_validation(&field, format!("not a number: '{raw}'")))
}
