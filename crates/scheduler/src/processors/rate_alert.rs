//! RateAlertProcessor - writes rates falling outside a closed interval

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use contracts::{ContractError, Currency, Descriptor, Processor};

/// Closed interval `[low, high]` of acceptable rate values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedInterval {
    pub low: f64,
    pub high: f64,
}

impl ClosedInterval {
    /// Whether a value lies inside the interval, bounds included
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Processor writing a line for every rate outside its interval
pub struct RateAlertProcessor<W> {
    name: String,
    interval: ClosedInterval,
    out: Mutex<W>,
}

impl<W: Write + Send> RateAlertProcessor<W> {
    /// Create an alert processor over the given interval and output
    pub fn new(name: impl Into<String>, interval: ClosedInterval, out: W) -> Self {
        Self {
            name: name.into(),
            interval,
            out: Mutex::new(out),
        }
    }
}

#[async_trait]
impl<W> Processor<Currency> for RateAlertProcessor<W>
where
    W: Write + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&self, descriptor: &Descriptor<Currency>) -> Result<(), ContractError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        for rate in &descriptor.payload.rates {
            if !self.interval.contains(rate.value) {
                rate.write_line(&mut *out)
                    .map_err(|e| ContractError::processor(&self.name, e.to_string()))?;
            }
        }
        Ok(())
    }
}
