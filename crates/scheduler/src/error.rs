//! Scheduler error types

use std::fmt;

use thiserror::Error;

use contracts::ContractError;

/// One processor's failure for one descriptor
#[derive(Debug, Error)]
#[error("processor '{processor}' failed: {error}")]
pub struct ProcessorFailure {
    /// Name of the failing processor
    pub processor: String,

    /// The failure it returned
    #[source]
    pub error: ContractError,
}

/// Aggregated fan-out failure for a single descriptor
///
/// Collects every processor failure for one descriptor. Logged by the
/// scheduler, never propagated; the dispatch loop continues regardless.
#[derive(Debug)]
pub struct DispatchError {
    /// Descriptor the fan-out was for
    pub descriptor_id: String,

    /// Failures in registration order
    pub failures: Vec<ProcessorFailure>,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "descriptor {}: {} processor(s) failed",
            self.descriptor_id,
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DispatchError {}
