//! Dispatch workers: accumulate records into batches and write them.
//!
//! Each worker owns its [`BatchBuffer`] outright and pulls from the shared
//! rendezvous channel. The producer dropping its sender is the drain
//! signal: every worker flushes its tail batch and exits. Write failures
//! are reported and counted, never retried or re-queued here.

use std::sync::Arc;

use dynarestore_types::diagnostic::{DiagnosticEvent, UnprocessedReport, WriteFailure};
use dynarestore_types::Record;

use crate::batch::BatchBuffer;
use crate::diagnostics::{self, DiagnosticSink};
use crate::writer::BatchWriter;

/// Immutable state shared by every worker of one run.
pub struct DispatchContext<W: BatchWriter> {
    pub writer: W,
    pub diagnostics: Arc<dyn DiagnosticSink>,
    pub table: String,
}

impl<W: BatchWriter> DispatchContext<W> {
    pub fn new(writer: W, diagnostics: Arc<dyn DiagnosticSink>, table: impl Into<String>) -> Self {
        Self {
            writer,
            diagnostics,
            table: table.into(),
        }
    }
}

/// Per-worker counters returned when the worker drains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker: usize,
    pub records_received: u64,
    pub batches_written: u64,
    pub batches_failed: u64,
    pub records_written: u64,
    pub records_unprocessed: u64,
    pub records_failed: u64,
}

impl WorkerSummary {
    fn new(worker: usize) -> Self {
        Self {
            worker,
            ..Self::default()
        }
    }
}

/// Run one worker until the channel disconnects.
pub async fn run_worker<W: BatchWriter>(
    worker: usize,
    ctx: Arc<DispatchContext<W>>,
    records: flume::Receiver<Record>,
) -> WorkerSummary {
    let mut buffer = BatchBuffer::new();
    let mut summary = WorkerSummary::new(worker);

    while let Ok(record) = records.recv_async().await {
        summary.records_received += 1;
        if let Some(batch) = buffer.push(record) {
            flush(&ctx, worker, batch, &mut summary).await;
        }
    }

    if let Some(batch) = buffer.drain() {
        flush(&ctx, worker, batch, &mut summary).await;
    }

    tracing::debug!(
        worker,
        records = summary.records_received,
        batches = summary.batches_written,
        failed_batches = summary.batches_failed,
        "Dispatch worker drained"
    );
    summary
}

async fn flush<W: BatchWriter>(
    ctx: &DispatchContext<W>,
    worker: usize,
    batch: Vec<Record>,
    summary: &mut WorkerSummary,
) {
    let batch_size = batch.len();

    match ctx.writer.write_batch(&ctx.table, batch).await {
        Ok(unprocessed) if unprocessed.is_empty() => {
            summary.batches_written += 1;
            summary.records_written += batch_size as u64;
            tracing::trace!(worker, batch_size, "Batch written");
        }
        Ok(unprocessed) => {
            let unprocessed_count = unprocessed.len();
            summary.batches_written += 1;
            summary.records_written += batch_size.saturating_sub(unprocessed_count) as u64;
            summary.records_unprocessed += unprocessed_count as u64;
            tracing::warn!(
                worker,
                batch_size,
                unprocessed = unprocessed_count,
                table = ctx.table.as_str(),
                "Store left items unprocessed"
            );
            ctx.diagnostics
                .emit(DiagnosticEvent::UnprocessedItems(UnprocessedReport::new(
                    ctx.table.clone(),
                    worker,
                    batch_size,
                    unprocessed,
                    diagnostics::now(),
                )));
        }
        Err(error) => {
            summary.batches_failed += 1;
            summary.records_failed += batch_size as u64;
            tracing::error!(
                worker,
                batch_size,
                table = ctx.table.as_str(),
                error = %error,
                "Batch write failed"
            );
            ctx.diagnostics.emit(DiagnosticEvent::WriteFailed(WriteFailure {
                table: ctx.table.clone(),
                worker,
                batch_size,
                error,
                reported_at: diagnostics::now(),
            }));
        }
    }
}
