//! # Fetch Client
//!
//! HTTP fetcher implementation.
//!
//! Responsibilities:
//! - Perform one GET per attempt against a `RequestTemplate`
//! - Populate descriptor timing and outcome flags stepwise
//! - Decode JSON bodies into the payload type
//! - Build NBP exchange-rate requests and convert responses

mod client;
pub mod nbp;

pub use client::HttpFetcher;
pub use nbp::{Converter, CurrencyFetcher, CurrencyResponse, RateRequest};
