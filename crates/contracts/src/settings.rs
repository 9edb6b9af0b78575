//! MonitorSettings - cadence configuration consumed at construction

use std::time::Duration;

use crate::ContractError;

/// Cadence and capacity settings for the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Fetch attempts issued per tick, sequentially
    pub attempts_per_tick: u32,

    /// Time between bursts
    pub tick_interval: Duration,

    /// Capacity of the descriptor channel; a full channel back-pressures
    /// the monitor
    pub channel_capacity: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            attempts_per_tick: 10,
            tick_interval: Duration::from_secs(5),
            channel_capacity: 100,
        }
    }
}

impl MonitorSettings {
    /// Validate the settings
    ///
    /// An empty burst or a zero interval is rejected up front, never
    /// silently accepted.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.attempts_per_tick == 0 {
            return Err(ContractError::config_validation(
                "monitor.attempts_per_tick",
                "must be >= 1",
            ));
        }
        if self.tick_interval.is_zero() {
            return Err(ContractError::config_validation(
                "monitor.tick_interval",
                "must be a positive duration",
            ));
        }
        if self.channel_capacity == 0 {
            return Err(ContractError::config_validation(
                "monitor.channel_capacity",
                "must be >= 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(MonitorSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let settings = MonitorSettings {
            attempts_per_tick: 0,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("attempts_per_tick"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let settings = MonitorSettings {
            tick_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let settings = MonitorSettings {
            channel_capacity: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
