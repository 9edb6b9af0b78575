//! Descriptor - immutable record of one fetch attempt
//!
//! Created at the fetcher boundary, read-only for every downstream processor.

use std::io::{self, Write};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome and metadata of a single fetch attempt
///
/// The payload stays at `T::default()` unless all three outcome flags are
/// true and decoding succeeded. `duration` is zero when the attempt failed
/// before a response was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor<T> {
    /// Attempt identifier, unique within a process lifetime
    pub id: String,

    /// Request target
    pub url: String,

    /// Instant the attempt began
    pub time: DateTime<Utc>,

    /// Response status was 200 OK
    pub valid_status_code: bool,

    /// Response content type was `application/json`
    pub json_content_type: bool,

    /// Response body was well-formed JSON
    pub well_formed_payload: bool,

    /// Fetch latency
    pub duration: Duration,

    /// Decoded payload
    pub payload: T,
}

impl<T: Default> Descriptor<T> {
    /// Create a fresh descriptor for an attempt starting now
    ///
    /// All outcome flags start false; the fetcher flips them as the
    /// attempt progresses.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            time: Utc::now(),
            valid_status_code: false,
            json_content_type: false,
            well_formed_payload: false,
            duration: Duration::ZERO,
            payload: T::default(),
        }
    }
}

impl<T> Descriptor<T> {
    /// Whether all three outcome flags are set
    pub fn is_valid(&self) -> bool {
        self.valid_status_code && self.json_content_type && self.well_formed_payload
    }

    /// Convert the payload, keeping every other field as-is
    pub fn map_payload<U>(self, f: impl FnOnce(T) -> U) -> Descriptor<U> {
        Descriptor {
            id: self.id,
            url: self.url,
            time: self.time,
            valid_status_code: self.valid_status_code,
            json_content_type: self.json_content_type,
            well_formed_payload: self.well_formed_payload,
            duration: self.duration,
            payload: f(self.payload),
        }
    }

    /// Render the one-line textual form
    ///
    /// This literal shape is a compatibility surface; external tooling
    /// parses it.
    pub fn render_line(&self) -> String {
        format!(
            "request id={} url={} time={} validStatusCode={} json={} validJson={} duration={:?}",
            self.id,
            self.url,
            self.time.to_rfc3339(),
            self.valid_status_code,
            self.json_content_type,
            self.well_formed_payload,
            self.duration,
        )
    }

    /// Write the one-line textual form, newline-terminated
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.render_line())
    }
}
