//! # Scheduler
//!
//! Descriptor fan-out module.
//!
//! Responsibilities:
//! - Consume `Descriptor` from the monitor's channel
//! - Fan out each descriptor to every registered processor concurrently
//! - Join the fan-out, aggregate processor failures, log, continue
//! - Isolate failures so no processor can halt the stream

pub mod error;
pub mod metrics;
pub mod processors;
mod scheduler;

pub use contracts::{Descriptor, Processor};
pub use error::{DispatchError, ProcessorFailure};
pub use metrics::{MetricsSnapshot, ProcessorMetrics};
pub use processors::{ClosedInterval, LogProcessor, RateAlertProcessor, WriterProcessor};
pub use scheduler::Scheduler;
