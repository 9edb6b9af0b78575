//! RequestTemplate - prepared, read-only request description
//!
//! Built once before the monitor starts and reused across every tick and
//! every attempt within a tick. Never mutated after construction, so
//! concurrent reads by multiple fetch attempts are safe.

use serde::{Deserialize, Serialize};

/// Opaque request description: target plus headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTemplate {
    url: String,
    headers: Vec<(String, String)>,
}

impl RequestTemplate {
    /// Create a template for a GET of the given target
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Append a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Request target
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers in insertion order
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_keep_insertion_order() {
        let template = RequestTemplate::new("http://host/path")
            .with_header("Accept", "application/json")
            .with_header("User-Agent", "ratewatch");

        assert_eq!(template.url(), "http://host/path");
        assert_eq!(
            template.headers(),
            &[
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), "ratewatch".to_string()),
            ]
        );
    }
}
