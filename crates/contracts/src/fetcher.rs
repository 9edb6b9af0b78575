//! Fetcher trait - fetch attempt abstraction
//!
//! Decouples the monitor from concrete HTTP semantics. A fetcher performs
//! one attempt against a prepared template and returns a descriptor, or a
//! failure still carrying the partial descriptor produced so far.

use crate::{ContractError, Descriptor, RequestTemplate};

/// A failed attempt
///
/// Timing and outcome flags are populated as far as the attempt got, so the
/// monitor can emit the partial descriptor downstream before logging the
/// error.
#[derive(Debug)]
pub struct FetchFailure<T> {
    /// Partial descriptor of the failed attempt
    pub descriptor: Descriptor<T>,

    /// What went wrong
    pub error: ContractError,
}

/// Fetch capability consumed by the monitor
#[trait_variant::make(Fetcher: Send)]
pub trait LocalFetcher {
    /// Decoded payload type
    type Payload: Default + Send;

    /// Perform one fetch attempt
    ///
    /// # Errors
    /// Returns the partial descriptor alongside a transport, response, or
    /// payload error.
    async fn perform(
        &self,
        template: &RequestTemplate,
    ) -> Result<Descriptor<Self::Payload>, FetchFailure<Self::Payload>>;
}
