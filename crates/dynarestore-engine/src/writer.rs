//! Remote write seam used by the dispatch workers.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use dynarestore_types::{Record, WriteError, WriteRequest};

/// Capability to write one batch to the destination store.
///
/// Implementations own retry, backoff, and connection handling, and must be
/// safe to call from every worker concurrently.
#[async_trait]
pub trait BatchWriter: Send + Sync {
    /// Write at most 25 records to `table`.
    ///
    /// Returns the records the store accepted but did not persist.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the call failed as a whole.
    async fn write_batch(&self, table: &str, items: Vec<Record>) -> Result<Vec<Record>, WriteError>;
}

/// Preview writer: prints every put request as a JSON line instead of
/// contacting the store.
pub struct DryRunWriter<W: Write + Send> {
    out: Mutex<W>,
}

impl DryRunWriter<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> DryRunWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl<W: Write + Send> BatchWriter for DryRunWriter<W> {
    async fn write_batch(&self, table: &str, items: Vec<Record>) -> Result<Vec<Record>, WriteError> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let line = serde_json::to_string(&WriteRequest::from(item))
                .map_err(|e| WriteError::conversion("SERIALIZE_FAILED", e.to_string()))?;
            lines.push(line);
        }

        let mut out = self.out.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        for line in &lines {
            writeln!(out, "{line}")
                .map_err(|e| WriteError::internal("DRY_RUN_OUTPUT", e.to_string()))?;
        }
        tracing::debug!(table, records = lines.len(), "Dry-run batch printed");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynarestore_types::AttributeValue;

    #[tokio::test]
    async fn dry_run_prints_one_line_per_item() {
        let writer = DryRunWriter::new(Vec::new());
        let items: Vec<Record> = (0..3)
            .map(|i| [("n", AttributeValue::N(i.to_string()))].into_iter().collect())
            .collect();

        let unprocessed = writer.write_batch("t", items).await.unwrap();
        assert!(unprocessed.is_empty());

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"PutRequest":{"Item":{"n":{"N":"0"}}}}"#);
    }
}
