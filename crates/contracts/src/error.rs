//! Layered error definitions
//!
//! Categorized by source: config / transport / response / payload / processor.
//! Transport, response, and payload errors are terminal for a single attempt
//! only; processor errors are aggregated per descriptor by the scheduler.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Fetch Errors =====
    /// The request could not be performed at all
    #[error("transport error for '{url}': {message}")]
    Transport { url: String, message: String },

    /// Wrong status or unreadable body
    #[error("response error for '{url}': {message}")]
    Response { url: String, message: String },

    /// Wrong content type or undecodable payload
    #[error("payload error for '{url}': {message}")]
    Payload { url: String, message: String },

    // ===== Processor Errors =====
    /// A consumer failed reacting to a descriptor
    #[error("processor '{processor}' error: {message}")]
    Processor { processor: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create transport error
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create response error
    pub fn response(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Response {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create payload error
    pub fn payload(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Payload {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create processor error
    pub fn processor(processor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Processor {
            processor: processor.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ContractError::config_validation("monitor.attempts_per_tick", "must be >= 1");
        assert_eq!(
            err.to_string(),
            "config validation error at 'monitor.attempts_per_tick': must be >= 1"
        );

        let err = ContractError::transport("http://host", "connection refused");
        assert_eq!(
            err.to_string(),
            "transport error for 'http://host': connection refused"
        );
    }
}
