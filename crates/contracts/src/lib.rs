//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `Descriptor<T>` is the immutable record of one fetch attempt
//! - `RequestTemplate` is the prepared, read-only request reused across attempts
//! - `Currency` / `Rate` are the decoded domain payloads

mod blueprint;
mod currency;
mod descriptor;
mod error;
mod fetcher;
mod processor;
mod settings;
mod template;

pub use blueprint::*;
pub use currency::{Currency, Rate};
pub use descriptor::Descriptor;
pub use error::*;
pub use fetcher::{FetchFailure, Fetcher};
pub use processor::Processor;
pub use settings::MonitorSettings;
pub use template::RequestTemplate;
