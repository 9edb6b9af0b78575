//! # Monitor
//!
//! Scheduled fetch producer.
//!
//! Responsibilities:
//! - Drive a tick clock
//! - Issue a fixed-size burst of sequential fetch attempts per tick
//! - Stream each resulting `Descriptor` over a bounded channel
//! - Stop between bursts when the cancellation token fires

mod monitor;

pub use contracts::{Descriptor, Fetcher, MonitorSettings, RequestTemplate};
pub use monitor::Monitor;
