//! PipelineBlueprint - Config Loader output
//!
//! Describes a complete pipeline configuration: cadence, request target,
//! and processor routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::MonitorSettings;

/// Complete pipeline configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineBlueprint {
    /// Cadence settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Request target settings
    pub request: RequestConfig,

    /// Processor routing configuration
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
}

impl PipelineBlueprint {
    /// Resolve the monitor section into runtime settings
    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            attempts_per_tick: self.monitor.attempts_per_tick,
            tick_interval: Duration::from_millis(self.monitor.tick_interval_ms),
            channel_capacity: self.monitor.channel_capacity,
        }
    }
}

/// Cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Fetch attempts per tick
    #[serde(default = "default_attempts_per_tick")]
    pub attempts_per_tick: u32,

    /// Tick interval in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Descriptor channel capacity
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            attempts_per_tick: default_attempts_per_tick(),
            tick_interval_ms: default_tick_interval_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_attempts_per_tick() -> u32 {
    10
}

fn default_tick_interval_ms() -> u64 {
    5000
}

fn default_channel_capacity() -> usize {
    100
}

/// Request target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Rate API domain
    #[serde(default = "default_domain")]
    pub domain: String,

    /// ISO 4217 currency code, e.g. "EUR"
    pub currency: String,

    /// Number of historical rates to request
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

fn default_domain() -> String {
    "api.nbp.pl".to_string()
}

fn default_history_days() -> u32 {
    1
}

/// Processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Unique processor name
    pub name: String,

    /// Processor kind
    pub kind: ProcessorKind,

    /// Kind-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Supported processor kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorKind {
    /// Write the descriptor line to a file or stdout
    Writer,

    /// Log a descriptor summary via tracing
    Log,

    /// Write rates falling outside a closed interval
    RateAlert,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_settings_conversion() {
        let blueprint = PipelineBlueprint {
            monitor: MonitorConfig {
                attempts_per_tick: 2,
                tick_interval_ms: 100,
                channel_capacity: 8,
            },
            request: RequestConfig {
                domain: default_domain(),
                currency: "EUR".to_string(),
                history_days: 30,
            },
            processors: Vec::new(),
        };

        let settings = blueprint.monitor_settings();
        assert_eq!(settings.attempts_per_tick, 2);
        assert_eq!(settings.tick_interval, Duration::from_millis(100));
        assert_eq!(settings.channel_capacity, 8);
    }

    #[test]
    fn test_processor_kind_snake_case() {
        let kind: ProcessorKind = serde_json::from_str("\"rate_alert\"").unwrap();
        assert_eq!(kind, ProcessorKind::RateAlert);
    }
}
