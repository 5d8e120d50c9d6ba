//! Restore run result aggregation.

use std::time::Duration;

use crate::dispatcher::WorkerSummary;
use crate::producer::ProducerSummary;

/// Outcome of a completed restore run.
///
/// A run that returns this considered every input record; write failures
/// show up in the counters and in diagnostics, not as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreSummary {
    pub lines_read: u64,
    pub records_restored: u64,
    pub records_other_tenant: u64,
    pub sentinels_excluded: u64,
    pub batches_written: u64,
    pub batches_failed: u64,
    pub records_written: u64,
    pub records_unprocessed: u64,
    /// Every record of a batch whose write call returned an error.
    pub records_failed: u64,
    pub workers: usize,
    pub duration_secs: f64,
}

impl RestoreSummary {
    pub(crate) fn aggregate(
        producer: &ProducerSummary,
        workers: &[WorkerSummary],
        elapsed: Duration,
    ) -> Self {
        let mut summary = Self {
            lines_read: producer.lines_read,
            records_restored: producer.records_forwarded,
            records_other_tenant: producer.records_other_tenant,
            sentinels_excluded: producer.sentinels_excluded,
            workers: workers.len(),
            duration_secs: elapsed.as_secs_f64(),
            ..Self::default()
        };
        for worker in workers {
            summary.batches_written += worker.batches_written;
            summary.batches_failed += worker.batches_failed;
            summary.records_written += worker.records_written;
            summary.records_unprocessed += worker.records_unprocessed;
            summary.records_failed += worker.records_failed;
        }
        summary
    }

    /// True when every dispatched record was persisted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.batches_failed == 0 && self.records_unprocessed == 0
    }
}
