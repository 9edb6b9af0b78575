//! Processor trait - scheduler fan-out target
//!
//! Defines the abstract interface for descriptor consumers. The scheduler
//! joins every fan-out before reading the next descriptor, so an
//! implementation sees at most one in-flight call to itself at a time and
//! may guard an inner writer with an uncontended mutex.

use async_trait::async_trait;

use crate::{ContractError, Descriptor};

/// Descriptor consumer trait
///
/// All processor implementations must implement this trait. Failures are
/// reported, never allowed to kill the dispatch loop.
#[async_trait]
pub trait Processor<T>: Send + Sync {
    /// Processor name (used for logging/metrics)
    fn name(&self) -> &str;

    /// React to one descriptor
    ///
    /// # Errors
    /// Returns the processor's own failure (should include context)
    async fn process(&self, descriptor: &Descriptor<T>) -> Result<(), ContractError>;
}
