//! Built-in processors

mod log;
mod rate_alert;
mod writer;

pub use log::LogProcessor;
pub use rate_alert::{ClosedInterval, RateAlertProcessor};
pub use writer::WriterProcessor;
