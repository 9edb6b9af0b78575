//! LogProcessor - logs descriptor summary via tracing

use async_trait::async_trait;
use tracing::info;

use contracts::{ContractError, Descriptor, Processor};

/// Processor that logs descriptor summaries for debugging
pub struct LogProcessor {
    name: String,
}

impl LogProcessor {
    /// Create a new LogProcessor with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl<T: Send + Sync> Processor<T> for LogProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&self, descriptor: &Descriptor<T>) -> Result<(), ContractError> {
        info!(
            processor = %self.name,
            id = %descriptor.id,
            url = %descriptor.url,
            valid_status_code = descriptor.valid_status_code,
            json = descriptor.json_content_type,
            valid_json = descriptor.well_formed_payload,
            duration = ?descriptor.duration,
            "descriptor received"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_processor_never_fails() {
        let processor = LogProcessor::new("summary");
        let descriptor: Descriptor<u64> = Descriptor::new("a1", "http://some/domain");
        assert!(processor.process(&descriptor).await.is_ok());
    }

    #[test]
    fn test_log_processor_name() {
        let processor = LogProcessor::new("summary");
        assert_eq!(Processor::<u64>::name(&processor), "summary");
    }
}
