//! WriterProcessor - writes the descriptor line to any writer

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use contracts::{ContractError, Descriptor, Processor};

/// Processor writing each descriptor's textual line to an output
///
/// The scheduler guarantees at most one in-flight call per processor, so
/// the mutex around the writer is uncontended.
pub struct WriterProcessor<W> {
    name: String,
    out: Mutex<W>,
}

impl<W: Write + Send> WriterProcessor<W> {
    /// Create a writer processor with the given name and output
    pub fn new(name: impl Into<String>, out: W) -> Self {
        Self {
            name: name.into(),
            out: Mutex::new(out),
        }
    }
}

#[async_trait]
impl<T, W> Processor<T> for WriterProcessor<W>
where
    T: Send + Sync,
    W: Write + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&self, descriptor: &Descriptor<T>) -> Result<(), ContractError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        descriptor
            .write_line(&mut *out)
            .map_err(|e| ContractError::processor(&self.name, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Shared in-memory writer for assertions
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_writes_one_line_per_descriptor() {
        let buf = SharedBuf::default();
        let processor = WriterProcessor::new("writer", buf.clone());

        let descriptor: Descriptor<u64> = Descriptor::new("a1", "http://some/domain");
        processor.process(&descriptor).await.unwrap();
        processor.process(&descriptor).await.unwrap();

        let contents = buf.contents();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("request id=a1 url=http://some/domain "));
    }

    #[tokio::test]
    async fn test_write_error_reported_not_thrown() {
        struct BrokenWriter;

        impl Write for BrokenWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let processor = WriterProcessor::new("writer", BrokenWriter);
        let descriptor: Descriptor<u64> = Descriptor::new("a1", "http://some/domain");

        let err = processor.process(&descriptor).await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
